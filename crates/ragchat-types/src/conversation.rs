use serde::{Deserialize, Serialize};

/// A backend-owned conversation. The client only ever holds its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
}

impl Conversation {
    /// First eight characters of the id, for list labels.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn label(&self) -> String {
        format!("Conversation {}...", self.short_id())
    }

    /// Creation time as `YYYY-MM-DD HH:MM` (UTC), or the raw string when it
    /// is not RFC 3339.
    pub fn created_label(&self) -> String {
        match chrono::DateTime::parse_from_rfc3339(&self.created_at) {
            Ok(dt) => dt
                .with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            Err(_) => self.created_at.clone(),
        }
    }
}

/// Reply of `POST /api/chat/conversation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    pub conversation_id: String,
}

/// Reply of `POST /api/folder/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// File extensions the indexer accepts
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "docx", "csv", "xlsx"];

pub fn is_supported_document(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => SUPPORTED_EXTENSIONS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// `accept` attribute for the file input
pub fn accept_attribute() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}
