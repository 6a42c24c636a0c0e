//! Scripted `ChatBackend` for unit tests.
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatBackend, ChatReply, Message, Usage};
use crate::core::ChatError;

#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
    transcripts: Mutex<VecDeque<Result<String, ChatError>>>,
    pub requests: Mutex<Vec<Vec<Message>>>,
    pub transcribed: Mutex<Vec<PathBuf>>,
}

impl FakeBackend {
    pub fn reply(self, content: &str, total_tokens: u32) -> Self {
        self.replies.lock().unwrap().push_back(Ok(ChatReply {
            content: content.to_string(),
            usage: Usage {
                prompt_tokens: total_tokens / 2,
                completion_tokens: total_tokens - total_tokens / 2,
                total_tokens,
            },
        }));
        self
    }

    pub fn chat_error(self, err: ChatError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn transcript(self, text: &str) -> Self {
        self.transcripts
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn transcription_error(self, err: ChatError) -> Self {
        self.transcripts.lock().unwrap().push_back(Err(err));
        self
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn complete_chat(&self, messages: &[Message]) -> Result<ChatReply, ChatError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::api(None, "no scripted reply")))
    }

    async fn transcribe_audio(&self, path: &Path) -> Result<String, ChatError> {
        self.transcribed.lock().unwrap().push(path.to_path_buf());
        self.transcripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::api(None, "no scripted transcript")))
    }
}
