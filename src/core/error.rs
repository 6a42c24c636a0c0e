//! Error types for talking to the completion and transcription
//! endpoints.

/// Errors from a chat or transcription exchange.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("failed to encode conversation: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API call failed{}: {message}", status_suffix(.status))]
    ApiCall {
        status: Option<u16>,
        /// Timeouts and connection failures
        transient: bool,
        message: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

impl ChatError {
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        ChatError::ApiCall {
            status,
            transient: false,
            message: message.into(),
        }
    }

    /// Whether a caller could reasonably try the same call again.
    /// Nothing in this crate retries; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::ApiCall {
                status, transient, ..
            } => *transient || matches!(status, Some(429) | Some(500..=599)),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::ApiCall {
            status: err.status().map(|s| s.as_u16()),
            transient: err.is_timeout() || err.is_connect(),
            message: err.to_string(),
        }
    }
}
