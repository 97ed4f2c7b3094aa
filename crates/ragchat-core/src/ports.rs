//! Port traits: the hexagonal architecture boundary.
//!
//! Implementations live in `ragchat-platform` (browser adapters).
//! The core only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use ragchat_types::{
    Result,
    auth::RegisterRequest,
    conversation::{Conversation, UploadReceipt},
    message::{ChatRequest, ChatResponse, Message},
};

// ─── Backend Port ────────────────────────────────────────────

/// Raw response body chunks, in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>>>>;

/// What the chat endpoint answered with
pub enum ChatReply {
    /// A single JSON document
    Complete(ChatResponse),
    /// A `text/event-stream` body still being received
    Stream(ByteStream),
}

/// The assistant backend. Every authenticated call takes the bearer token
/// and maps HTTP 401 to `ChatError::Unauthorized`.
#[async_trait(?Send)]
pub trait BackendPort {
    /// Exchange credentials for a bearer token
    async fn login(&self, email: &str, password: &str) -> Result<String>;

    async fn register(&self, req: &RegisterRequest) -> Result<()>;

    /// Messages of one conversation, or the default history when `None`
    async fn history(&self, token: &str, conversation_id: Option<&str>) -> Result<Vec<Message>>;

    /// Create a conversation and return its id
    async fn create_conversation(&self, token: &str) -> Result<String>;

    async fn list_conversations(&self, token: &str) -> Result<Vec<Conversation>>;

    async fn send_message(&self, token: &str, req: &ChatRequest) -> Result<ChatReply>;

    async fn upload_document(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt>;
}

// ─── Key-Value Port ──────────────────────────────────────────

/// Small synchronous string store (browser localStorage or memory)
pub trait KeyValuePort {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
