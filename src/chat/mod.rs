mod conversation;
mod session;

pub use conversation::Conversation;
pub use session::{ChatSession, Exchange};
