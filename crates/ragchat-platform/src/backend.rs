//! HTTP adapter for the assistant backend.
//!
//! Uses browser `fetch()` via gloo-net. The chat endpoint may answer with a
//! single JSON document or a `text/event-stream` body, which is handed to the
//! core as a raw byte stream.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use ragchat_core::ports::{BackendPort, ChatReply};
use ragchat_types::{
    ChatError, Result,
    auth::{ErrorBody, RegisterRequest, TokenResponse},
    conversation::{Conversation, NewConversation, UploadReceipt},
    message::{ChatRequest, ChatResponse, Message},
};
use crate::stream::byte_stream;

const EVENT_STREAM: &str = "text/event-stream";
const LOGIN_FAILED: &str = "Incorrect email or password";
const REGISTER_FAILED: &str = "Registration failed";

/// Backend reached over HTTP at `base_url`.
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", &format!("Bearer {}", token))
    }
}

#[async_trait(?Send)]
impl BackendPort for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        form.append_with_str("email", email).map_err(js_error)?;
        form.append_with_str("password", password).map_err(js_error)?;

        let response = Request::post(&self.url("/api/auth/login"))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;

        // A 401 here means bad credentials, not an expired session.
        let response = reject_with_detail(response, LOGIN_FAILED).await?;
        let token: TokenResponse = read_json(response).await?;
        Ok(token.access_token)
    }

    async fn register(&self, req: &RegisterRequest) -> Result<()> {
        let response = Request::post(&self.url("/api/auth/register"))
            .json(req)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        reject_with_detail(response, REGISTER_FAILED).await?;
        Ok(())
    }

    async fn history(&self, token: &str, conversation_id: Option<&str>) -> Result<Vec<Message>> {
        let mut builder = Self::authed(Request::get(&self.url("/api/chat/history")), token);
        if let Some(id) = conversation_id {
            builder = builder.query([("conversation_id", id)]);
        }
        let response = builder.send().await.map_err(network)?;
        read_json(check(response).await?).await
    }

    async fn create_conversation(&self, token: &str) -> Result<String> {
        let response = Self::authed(Request::post(&self.url("/api/chat/conversation")), token)
            .send()
            .await
            .map_err(network)?;
        let created: NewConversation = read_json(check(response).await?).await?;
        Ok(created.conversation_id)
    }

    async fn list_conversations(&self, token: &str) -> Result<Vec<Conversation>> {
        let response = Self::authed(Request::get(&self.url("/api/conversations")), token)
            .send()
            .await
            .map_err(network)?;
        read_json(check(response).await?).await
    }

    async fn send_message(&self, token: &str, req: &ChatRequest) -> Result<ChatReply> {
        let response = Self::authed(Request::post(&self.url("/api/chat/request")), token)
            .header("Accept", &format!("{}, application/json", EVENT_STREAM))
            .json(req)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let response = check(response).await?;

        let streamed = response
            .headers()
            .get("content-type")
            .map(|ct| ct.starts_with(EVENT_STREAM))
            .unwrap_or(false);
        if streamed {
            let body = response
                .body()
                .ok_or_else(|| ChatError::Network("Stream response without a body".to_string()))?;
            log::debug!("Chat reply is streamed");
            return Ok(ChatReply::Stream(byte_stream(body)));
        }

        let reply: ChatResponse = read_json(response).await?;
        Ok(ChatReply::Complete(reply))
    }

    async fn upload_document(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
        let blob = web_sys::Blob::new_with_u8_array_sequence(&parts).map_err(js_error)?;
        let form = web_sys::FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", &blob, file_name)
            .map_err(js_error)?;

        let response = Self::authed(Request::post(&self.url("/api/folder/upload")), token)
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_json(check(response).await?).await
    }
}

// ─── Response helpers ────────────────────────────────────────

/// Status check for authenticated calls: 401 ends the session, any other
/// failure carries the backend's `detail`.
async fn check(response: Response) -> Result<Response> {
    if response.status() == 401 {
        return Err(ChatError::Unauthorized);
    }
    reject_with_detail(response, "Request failed").await
}

async fn reject_with_detail(response: Response, fallback: &str) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let detail = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.detail_text())
        .unwrap_or_else(|| fallback.to_string());
    Err(ChatError::Api { status, detail })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ChatError::Serialization(e.to_string()))
}

fn network(e: gloo_net::Error) -> ChatError {
    ChatError::Network(e.to_string())
}

fn js_error(e: wasm_bindgen::JsValue) -> ChatError {
    ChatError::JsInterop(format!("{:?}", e))
}
