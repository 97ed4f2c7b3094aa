//! Folds a streamed chat reply into a transcript sink.
//!
//! Frames are applied in decode order. A malformed frame is dropped by the
//! decoder and the stream carries on; a transport error finalizes whatever
//! arrived, appends one fixed notice and stops.

use futures::StreamExt;
use ragchat_types::{Result, event::TranscriptEvent};
use crate::ports::ByteStream;
use crate::sse::{SseDecoder, StreamFrame};
use crate::transcript::TranscriptSink;

pub struct StreamAssembler<S: TranscriptSink> {
    decoder: SseDecoder,
    sink: S,
    frames: usize,
}

impl<S: TranscriptSink> StreamAssembler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            decoder: SseDecoder::new(),
            sink,
            frames: 0,
        }
    }

    /// Feed one body chunk.
    pub fn feed(&mut self, chunk: &[u8]) {
        for frame in self.decoder.push(chunk) {
            self.apply(frame);
        }
    }

    /// The body ended normally: flush the carry-over and finalize.
    pub fn finish(mut self) -> S {
        for frame in self.decoder.finish() {
            self.apply(frame);
        }
        log::info!(
            "Stream complete: {} frames applied, {} skipped",
            self.frames,
            self.decoder.skipped()
        );
        self.sink.apply(TranscriptEvent::AssistantFinished);
        self.sink
    }

    /// The transport failed mid-stream.
    pub fn fail(mut self, notice: &str) -> S {
        self.sink.apply(TranscriptEvent::AssistantFinished);
        self.sink.apply(TranscriptEvent::Notice {
            text: notice.to_string(),
        });
        self.sink
    }

    /// Drive a whole body stream to completion.
    pub async fn run(mut self, mut body: ByteStream, failure_notice: &str) -> Result<S> {
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => self.feed(&bytes),
                Err(e) => {
                    log::error!("Stream interrupted after {} frames: {}", self.frames, e);
                    self.fail(failure_notice);
                    return Err(e);
                }
            }
        }
        Ok(self.finish())
    }

    fn apply(&mut self, frame: StreamFrame) {
        self.frames += 1;
        match frame {
            StreamFrame::Content(text) => {
                self.sink.apply(TranscriptEvent::AssistantDelta { text });
            }
            StreamFrame::Sources(sources) => {
                self.sink.apply(TranscriptEvent::SourcesAttached { sources });
            }
            StreamFrame::Progress(title) => self.sink.progress(title),
        }
    }
}
