//! `ReadableStream` body as a core `ByteStream`.

use futures::stream;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStream, ReadableStreamDefaultReader};

use ragchat_core::ports::ByteStream;
use ragchat_types::{ChatError, Result};

enum ReadState {
    Reading(ReadableStreamDefaultReader),
    Done,
}

/// Pull chunks from `body` until the stream reports `done`. A read error is
/// yielded once and ends the stream.
pub fn byte_stream(body: ReadableStream) -> ByteStream {
    let reader: ReadableStreamDefaultReader = body.get_reader().unchecked_into();
    Box::pin(stream::unfold(ReadState::Reading(reader), |state| async move {
        let ReadState::Reading(reader) = state else {
            return None;
        };
        match read_chunk(&reader).await {
            Ok(Some(chunk)) => Some((Ok(chunk), ReadState::Reading(reader))),
            Ok(None) => None,
            Err(e) => Some((Err(e), ReadState::Done)),
        }
    }))
}

/// One `reader.read()`; `None` once the stream is exhausted.
async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| ChatError::Network(format!("Stream read failed: {:?}", e)))?;

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }

    let value = Reflect::get(&result, &JsValue::from_str("value"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}
