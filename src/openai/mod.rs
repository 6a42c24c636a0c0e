mod core;
mod transcription;

pub use self::core::{
    ChatBackend, ChatCompletion, ChatReply, Choice, ChoiceMessage, Message, OpenAiClient, Role,
    Usage,
};
pub use self::transcription::Transcription;

#[cfg(test)]
pub(crate) mod fake;
