use serde::{Deserialize, Serialize};
use url::Url;

/// Path prefix the backend stores indexed documents under.
pub const DATA_DIR_PREFIX: &str = "data/";
/// Viewer route used when a source carries no explicit `view_url`.
pub const VIEW_ROUTE: &str = "/api/folder/view/";
/// Display name used when a source has neither a file name nor a path.
pub const FALLBACK_DOCUMENT_NAME: &str = "document";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Retrieval sources backing an assistant answer
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "source_nodes")]
    pub sources: Vec<Source>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }
}

/// A retrieval source attached to an assistant message.
///
/// The canonical shape keeps the score under `metadata`; older backends sent
/// a bare top-level `score`, which is still accepted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: SourceMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Backend-side path, usually `data/<file>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}

impl Source {
    /// Relevance score, 0.0 when the backend sent none.
    pub fn score(&self) -> f64 {
        self.metadata.score.or(self.score).unwrap_or(0.0)
    }

    pub fn display_name(&self) -> String {
        let meta = &self.metadata;
        if let Some(name) = meta.file_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match meta.source.as_deref().filter(|s| !s.is_empty()) {
            Some(path) => path.strip_prefix(DATA_DIR_PREFIX).unwrap_or(path).to_string(),
            None => FALLBACK_DOCUMENT_NAME.to_string(),
        }
    }

    /// Viewer path for this source, relative to the backend base URL unless
    /// the backend sent an absolute one.
    pub fn view_path(&self) -> String {
        match self.metadata.view_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => url.to_string(),
            None => viewer_route(&self.display_name()),
        }
    }
}

/// `VIEW_ROUTE` plus the document path, each segment percent-encoded.
/// Slashes inside the name stay path separators.
fn viewer_route(name: &str) -> String {
    let fallback = || format!("{}{}", VIEW_ROUTE, name);
    let Ok(mut url) = Url::parse("http://localhost").and_then(|base| base.join(VIEW_ROUTE)) else {
        return fallback();
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(name.split('/'));
        }
        Err(()) => return fallback(),
    }
    url.path().to_string()
}

/// Body of `POST /api/chat/request`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Non-streaming reply of the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(alias = "response")]
    pub content: String,
    #[serde(default)]
    pub source_nodes: Vec<Source>,
}

impl ChatResponse {
    pub fn into_message(self) -> Message {
        Message::assistant(self.content).with_sources(self.source_nodes)
    }
}
