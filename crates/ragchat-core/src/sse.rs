//! Incremental decoder for the chat endpoint's Server-Sent-Event body.
//!
//! Chunks arrive with arbitrary boundaries, so bytes after the last newline
//! are carried over until the next chunk completes the line. Decoding works
//! on bytes and only converts whole lines to UTF-8, which keeps multi-byte
//! characters split across chunks intact.

use serde::Deserialize;
use serde_json::Value;
use ragchat_types::{Result, message::Source};

const DATA_FIELD: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit of the event stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// Text to append to the in-progress answer
    Content(String),
    /// Sources backing the in-progress answer
    Sources(Vec<Source>),
    /// Retrieval progress, e.g. "Found 3 sources"
    Progress(String),
}

/// Wire shapes of a `data:` payload. `Typed` is tried first so a payload
/// carrying `type` never falls through to `Content`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireFrame {
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        data: Value,
    },
    Content {
        content: String,
    },
}

#[derive(Deserialize)]
struct ProgressData {
    title: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every frame completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(frame) = self.decode_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decode whatever is left once the body has ended.
    pub fn finish(&mut self) -> Vec<StreamFrame> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.pending);
        self.decode_line(&line).into_iter().collect()
    }

    /// Bytes held back waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Frames dropped because they failed to decode
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<StreamFrame> {
        let line = match std::str::from_utf8(raw) {
            Ok(s) => s.trim_end_matches(|c: char| c == '\n' || c == '\r'),
            Err(e) => {
                log::warn!("Skipping non UTF-8 stream line: {}", e);
                self.skipped += 1;
                return None;
            }
        };

        // Blank separators, `:` comments and other SSE fields carry nothing.
        let payload = line.strip_prefix(DATA_FIELD)?.trim_start();
        if payload.is_empty() || payload == DONE_SENTINEL {
            return None;
        }

        match parse_payload(payload) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Skipping malformed stream frame ({}): {}", e, payload);
                self.skipped += 1;
                None
            }
        }
    }
}

/// Parse one `data:` payload. `Ok(None)` means a well-formed frame of a kind
/// the client does not use.
pub fn parse_payload(payload: &str) -> Result<Option<StreamFrame>> {
    let frame = match serde_json::from_str::<WireFrame>(payload)? {
        WireFrame::Content { content } => Some(StreamFrame::Content(content)),
        WireFrame::Typed { kind, data } => match kind.as_str() {
            "sources" => Some(StreamFrame::Sources(serde_json::from_value(data)?)),
            "events" => {
                let progress: ProgressData = serde_json::from_value(data)?;
                Some(StreamFrame::Progress(progress.title))
            }
            other => {
                log::debug!("Ignoring stream frame of type {}", other);
                None
            }
        },
    };
    Ok(frame)
}
