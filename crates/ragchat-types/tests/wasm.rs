//! WASM-target tests for ragchat-types.
//!
//! Mirrors a subset of the native unit tests under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use ragchat_types::auth::*;
use ragchat_types::config::*;
use ragchat_types::conversation::*;
use ragchat_types::error::*;
use ragchat_types::message::*;

#[wasm_bindgen_test]
fn message_roundtrip_keeps_sources() {
    let msg = Message::assistant("answer").with_sources(vec![Source {
        text: "excerpt".to_string(),
        metadata: SourceMetadata {
            source: Some("data/a.pdf".to_string()),
            score: Some(0.75),
            ..Default::default()
        },
        score: None,
    }]);
    let json = serde_json::to_string(&msg).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

#[wasm_bindgen_test]
fn source_legacy_score() {
    let src: Source = serde_json::from_str(r#"{"score":0.6}"#).unwrap();
    assert_eq!(src.score(), 0.6);
    assert_eq!(src.display_name(), "document");
    assert_eq!(src.view_path(), "/api/folder/view/document");
}

#[wasm_bindgen_test]
fn conversation_created_label() {
    let conv = Conversation {
        id: "abcdefghij".to_string(),
        created_at: "2024-02-03T04:05:06Z".to_string(),
    };
    assert_eq!(conv.created_label(), "2024-02-03 04:05");
    assert_eq!(conv.label(), "Conversation abcdefgh...");
}

#[wasm_bindgen_test]
fn registration_mismatch() {
    let form = RegistrationForm {
        password: "a".to_string(),
        confirm_password: "b".to_string(),
        ..Default::default()
    };
    assert_eq!(
        form.validate(),
        Err(ChatError::Validation(PASSWORD_MISMATCH.to_string()))
    );
}

#[wasm_bindgen_test]
fn config_resolve_url() {
    let config = ClientConfig::default();
    assert_eq!(
        config.resolve_url("/api/folder/view/a.pdf"),
        "http://localhost:8000/api/folder/view/a.pdf"
    );
}

#[wasm_bindgen_test]
fn supported_documents() {
    assert!(is_supported_document("a.PDF"));
    assert!(!is_supported_document("a.exe"));
}
