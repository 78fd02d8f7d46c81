use thiserror::Error;

/// Failures talking to a text-generation provider.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing or malformed credentials; retrying will not help.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// 2xx reply that carried no usable text (safety block, token cap).
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl AiError {
    /// Transient failures worth another attempt later.
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Timeout(_) | AiError::Network(_) => true,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            AiError::Config(_) | AiError::Parse(_) | AiError::EmptyResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout(e.to_string())
        } else {
            AiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}
