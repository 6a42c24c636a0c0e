use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::{AppConfig, ChatError};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// A single turn in the conversation. There are no setters, once a
/// message is created it stays as is.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }

    pub fn system(content: &str) -> Self {
        Message::new(Role::System, content)
    }

    pub fn user(content: &str) -> Self {
        Message::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Message::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// The message in a choice is decoded loosely because some compatible
// servers send `null` content or roles we don't model
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
}

/// Response envelope from `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub usage: Usage,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub usage: Usage,
}

impl From<ChatCompletion> for ChatReply {
    fn from(completion: ChatCompletion) -> Self {
        // No choices is not an error, it's an empty reply
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        ChatReply {
            content,
            usage: completion.usage,
        }
    }
}

/// The remote side of a conversation. Calls are awaited one at a
/// time by the session, never in parallel.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the full history and get the next assistant reply.
    async fn complete_chat(&self, messages: &[Message]) -> Result<ChatReply, ChatError>;

    /// Turn the audio file at `path` into text.
    async fn transcribe_audio(&self, path: &Path) -> Result<String, ChatError>;
}

/// `ChatBackend` for OpenAI compatible APIs.
#[derive(Clone)]
pub struct OpenAiClient {
    pub(super) http: reqwest::Client,
    pub(super) chat_url: String,
    pub(super) transcription_url: String,
    pub(super) api_key: String,
    pub(super) chat_model: String,
    pub(super) transcription_model: String,
    pub(super) timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: config.chat_url(),
            transcription_url: config.transcription_url(),
            api_key: config.openai_api_key.clone(),
            chat_model: config.chat_model.clone(),
            transcription_model: config.transcription_model.clone(),
            timeout: config.request_timeout(),
        }
    }

    pub async fn completion(&self, messages: &[Message]) -> Result<ChatCompletion, ChatError> {
        let payload = json!({
            "model": self.chat_model,
            "messages": serde_json::to_value(messages)?,
        });
        tracing::debug!(
            "Requesting completion from {} with model {} and {} messages",
            self.chat_url,
            self.chat_model,
            messages.len()
        );

        let response = self
            .http
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let response = check_status(response).await?;
        let completion = response
            .json::<ChatCompletion>()
            .await
            .inspect_err(|e| tracing::error!("Decoding completion response failed: {}", e))?;

        tracing::debug!(
            "Completion {} used {} tokens",
            completion.id,
            completion.usage.total_tokens
        );
        Ok(completion)
    }
}

/// Turns a non-2xx response into an `ApiCall` error carrying the
/// status and whatever body the server sent back.
pub(super) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Request failed with status {}: {}", status, body);
    Err(ChatError::api(Some(status.as_u16()), body))
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete_chat(&self, messages: &[Message]) -> Result<ChatReply, ChatError> {
        Ok(self.completion(messages).await?.into())
    }

    async fn transcribe_audio(&self, path: &Path) -> Result<String, ChatError> {
        Ok(self.transcription(path).await?.text)
    }
}
