//! WASM-target tests for ragchat-core.
//!
//! Runs the stream decoder, assembler, citation and client flows under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use ragchat_core::assembler::StreamAssembler;
use ragchat_core::citation::*;
use ragchat_core::client::ChatClient;
use ragchat_core::event_bus::EventBus;
use ragchat_core::ports::*;
use ragchat_core::sse::*;
use ragchat_core::transcript::{Transcript, TranscriptSink};
use ragchat_types::auth::RegisterRequest;
use ragchat_types::config::ClientConfig;
use ragchat_types::conversation::{Conversation, UploadReceipt};
use ragchat_types::event::*;
use ragchat_types::message::*;

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

fn scored(score: f64, name: &str) -> Source {
    Source {
        text: String::new(),
        metadata: SourceMetadata {
            file_name: Some(name.to_string()),
            score: Some(score),
            ..Default::default()
        },
        score: None,
    }
}

// ─── Decoder Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn sse_split_line_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push("data: {\"content\":\"Hé".as_bytes()).is_empty());
    assert_eq!(
        decoder.push(b"llo\"}\n\n"),
        vec![StreamFrame::Content("Héllo".to_string())]
    );
}

#[wasm_bindgen_test]
fn sse_skips_malformed_and_done() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.push(b"data: nope\ndata: [DONE]\ndata: {\"content\":\"ok\"}\n");
    assert_eq!(frames, vec![StreamFrame::Content("ok".to_string())]);
    assert_eq!(decoder.skipped(), 1);
}

// ─── Assembler Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn assembler_builds_one_message() {
    let mut assembler = StreamAssembler::new(Transcript::new("Hi"));
    assembler.feed(b"data: {\"content\":\"Hel\"}\n\n");
    assembler.feed(b"data: {\"content\":\"lo\"}\n\n");
    assembler.feed(
        b"data: {\"type\":\"sources\",\"data\":[{\"text\":\"\",\"metadata\":{\"file_name\":\"a.pdf\",\"score\":0.9}}]}\n\n",
    );
    let transcript = assembler.finish();
    assert_eq!(transcript.entries().len(), 1);
    assert_eq!(transcript.entries()[0].content, "Hello");
    assert_eq!(transcript.entries()[0].sources.len(), 1);
    assert!(!transcript.is_streaming());
}

#[wasm_bindgen_test]
async fn assembler_run_reports_interruption() {
    let body: ByteStream = Box::pin(futures::stream::iter(vec![
        Ok(b"data: {\"content\":\"Par\"}\n".to_vec()),
        Err(ragchat_types::ChatError::Network("reset".to_string())),
    ]));
    let mut transcript = Transcript::new("Hi");
    transcript.push_user("q");
    let result = StreamAssembler::new(transcript).run(body, "Sorry").await;
    assert!(result.is_err());
}

// ─── Citation Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn citation_highest_above_threshold() {
    let sources = vec![scored(0.3, "a.pdf"), scored(0.9, "b.pdf"), scored(0.6, "c.pdf")];
    let citation = citation_for(&sources).unwrap();
    assert_eq!(citation.label(), " (source : b.pdf - 90.0%)");
    assert!(citation_for(&[scored(0.4, "a"), scored(0.5, "b")]).is_none());
}

// ─── Client Tests ────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
    data: RefCell<HashMap<String, String>>,
}

impl KeyValuePort for MemoryStore {
    fn get(&self, key: &str) -> ragchat_types::Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ragchat_types::Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ragchat_types::Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "test"
    }
}

/// Serves canned history and a two-chunk stream; rejects everything after
/// `expire` is set.
#[derive(Default)]
struct CannedBackend {
    expire: RefCell<bool>,
}

impl CannedBackend {
    fn check(&self) -> ragchat_types::Result<()> {
        if *self.expire.borrow() {
            Err(ragchat_types::ChatError::Unauthorized)
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl BackendPort for CannedBackend {
    async fn login(&self, _email: &str, _password: &str) -> ragchat_types::Result<String> {
        Ok("tok".to_string())
    }

    async fn register(&self, _req: &RegisterRequest) -> ragchat_types::Result<()> {
        Ok(())
    }

    async fn history(
        &self,
        _token: &str,
        conversation_id: Option<&str>,
    ) -> ragchat_types::Result<Vec<Message>> {
        self.check()?;
        Ok(match conversation_id {
            Some(id) => vec![Message::user(format!("asked in {}", id))],
            None => Vec::new(),
        })
    }

    async fn create_conversation(&self, _token: &str) -> ragchat_types::Result<String> {
        self.check()?;
        Ok("c2".to_string())
    }

    async fn list_conversations(&self, _token: &str) -> ragchat_types::Result<Vec<Conversation>> {
        self.check()?;
        Ok(vec![Conversation {
            id: "abc".to_string(),
            created_at: "2026-01-02T03:04:05Z".to_string(),
        }])
    }

    async fn send_message(&self, _token: &str, _req: &ChatRequest) -> ragchat_types::Result<ChatReply> {
        self.check()?;
        Ok(ChatReply::Stream(Box::pin(futures::stream::iter(vec![
            Ok(b"data: {\"content\":\"Hel".to_vec()),
            Ok(b"lo\"}\n\n".to_vec()),
        ]))))
    }

    async fn upload_document(
        &self,
        _token: &str,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> ragchat_types::Result<UploadReceipt> {
        self.check()?;
        Ok(UploadReceipt {
            filename: file_name.to_string(),
            message: None,
            size: None,
            status: None,
        })
    }
}

fn replay(events: &[ChatEvent]) -> Transcript {
    let mut transcript = Transcript::new("Hi");
    for event in events {
        if let ChatEvent::Transcript(t) = event {
            transcript.apply(t.clone());
        }
    }
    transcript
}

#[wasm_bindgen_test]
async fn client_login_select_and_send() {
    let backend = Rc::new(CannedBackend::default());
    let store = Rc::new(MemoryStore::default());
    let bus = EventBus::new();
    let client = ChatClient::new(ClientConfig::default(), backend, store.clone(), bus.clone());

    client.login("a@b.c", "pw").await.unwrap();
    assert_eq!(store.get("token").unwrap().as_deref(), Some("tok"));

    client.select_conversation(Some("abc".to_string())).await.unwrap();
    client.send("hello").await.unwrap();

    let transcript = replay(&bus.drain());
    let contents: Vec<&str> = transcript.entries().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["asked in abc", "hello", "Hello"]);
}

#[wasm_bindgen_test]
async fn client_expired_token_signs_out() {
    let backend = Rc::new(CannedBackend::default());
    let store = Rc::new(MemoryStore::default());
    store.set("token", "old").unwrap();
    let bus = EventBus::new();
    let client = ChatClient::new(ClientConfig::default(), backend.clone(), store.clone(), bus.clone());
    assert!(client.is_authenticated());

    *backend.expire.borrow_mut() = true;
    assert!(client.upload("notes.txt", vec![1]).await.is_err());

    assert!(!client.is_authenticated());
    assert!(store.get("token").unwrap().is_none());
    let events = bus.drain();
    assert!(events.contains(&ChatEvent::SignedOut {
        reason: SignOutReason::Expired
    }));
}
