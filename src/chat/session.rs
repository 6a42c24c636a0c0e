use crate::core::{AppConfig, ChatError};
use crate::openai::{ChatBackend, Message, Usage};

use super::conversation::Conversation;

/// Outcome of one user turn and its reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub reply: String,
    pub usage: Usage,
    /// Whether the oldest exchange was dropped to stay under budget
    pub evicted: bool,
}

/// Drives a single linear conversation with an LLM.
///
/// A session only exists once priming has succeeded, so everything
/// reachable through `exchange` is the interactive phase. Errors are
/// handed back to the caller as is, nothing is retried and the
/// process is never exited from here.
pub struct ChatSession<B> {
    backend: B,
    conversation: Conversation,
    token_threshold: u32,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Primes the conversation with the system message and the
    /// bootstrap question. The priming reply is not checked against
    /// the token budget.
    pub async fn start(backend: B, config: &AppConfig) -> Result<(Self, Exchange), ChatError> {
        let mut conversation = Conversation::new(&config.system_message);
        conversation.append(Message::user(&config.bootstrap_message));

        let reply = backend.complete_chat(conversation.messages()).await?;
        conversation.append(Message::assistant(&reply.content));
        tracing::info!("Session primed using {} tokens", reply.usage.total_tokens);

        let session = Self {
            backend,
            conversation,
            token_threshold: config.token_threshold,
        };
        let exchange = Exchange {
            reply: reply.content,
            usage: reply.usage,
            evicted: false,
        };
        Ok((session, exchange))
    }

    /// Sends `user_input` with the full history, records the reply and
    /// then applies the token budget. If the call fails the user turn
    /// stays at the end of the history without a reply.
    pub async fn exchange(&mut self, user_input: &str) -> Result<Exchange, ChatError> {
        self.conversation.append(Message::user(user_input));

        let reply = self
            .backend
            .complete_chat(self.conversation.messages())
            .await?;
        self.conversation.append(Message::assistant(&reply.content));

        let evicted = self
            .conversation
            .truncate(reply.usage.total_tokens, self.token_threshold);

        Ok(Exchange {
            reply: reply.content,
            usage: reply.usage,
            evicted,
        })
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }
}
