use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    /// The backend answered 401; the stored credential is no longer valid
    #[error("Session expired, please sign in again")]
    Unauthorized,

    #[error("HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl ChatError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ChatError::Unauthorized)
    }

    /// Text suitable for an inline banner. API errors show the backend's
    /// `detail` alone.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
