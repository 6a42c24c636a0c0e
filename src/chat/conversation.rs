//! The ordered message history for a single chat and the policy for
//! keeping it under the token budget.
use serde::Serialize;

use crate::openai::{Message, Role};

/// Ordered history of a conversation. The system message always sits
/// at index 0 and is never evicted.
///
/// Serializes to the `messages` array sent to the completion API.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    pub fn new(system_message: &str) -> Self {
        Self(vec![Message::system(system_message)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true, the system message is always there.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    /// Role ordering (user then assistant) is up to the caller.
    pub fn append(&mut self, msg: Message) {
        self.0.push(msg)
    }

    /// Evicts the oldest user/assistant pair when `total_tokens` is
    /// over `threshold`. Drops at most one pair per call so a single
    /// huge exchange can leave the history over budget until the next
    /// one. Returns whether anything was removed.
    pub fn truncate(&mut self, total_tokens: u32, threshold: u32) -> bool {
        if total_tokens <= threshold {
            return false;
        }
        if self.0.len() < 3 {
            tracing::warn!(
                "Token usage {} is over {} but there is no pair to evict",
                total_tokens,
                threshold
            );
            return false;
        }
        debug_assert_eq!(self.0[0].role(), Role::System);
        self.0.drain(1..3);
        tracing::debug!(
            "Token usage {} over {}, evicted oldest exchange ({} messages left)",
            total_tokens,
            threshold,
            self.0.len()
        );
        true
    }
}
