use serde::{Deserialize, Serialize};

/// Storage key the client config is persisted under
pub const CONFIG_STORAGE_KEY: &str = "ragchat:config";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash
    pub api_base: String,
    /// Storage key holding the bearer token
    pub credential_key: String,
    /// Synthetic first message of every transcript
    pub greeting: String,
    /// Appended when a chat request or stream fails
    pub failure_text: String,
    /// Shown instead of the transcript when a history fetch fails
    pub history_failure_text: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            credential_key: "token".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            failure_text: "Sorry, an error occurred. Please try again.".to_string(),
            history_failure_text: "Could not load this conversation. Please try again."
                .to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolve a backend-relative path (e.g. a viewer URL) to an absolute URL.
    /// Absolute URLs pass through untouched.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.api_base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

const DEFAULT_API_BASE: &str = "http://localhost:8000";

const DEFAULT_GREETING: &str = "Hello! I'm your document assistant. Ask me anything about the files you've uploaded.";
