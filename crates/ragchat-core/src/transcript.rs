//! The ordered message list of the active conversation.

use ragchat_types::event::TranscriptEvent;
use ragchat_types::message::{Message, Source};

/// Anything transcript events can be folded into: the transcript itself,
/// or the event bus that forwards them to the UI.
pub trait TranscriptSink {
    fn apply(&mut self, event: TranscriptEvent);

    /// Retrieval progress reported mid-stream. Not part of the transcript.
    fn progress(&mut self, _title: String) {}
}

/// Greeting first, then the conversation's messages. The greeting is never
/// sent to or loaded from the backend, so it is held apart from `entries`.
///
/// While `streaming` is set, the last entry is the one in-progress assistant
/// message; every other entry is final.
#[derive(Debug, Clone)]
pub struct Transcript {
    greeting: Message,
    entries: Vec<Message>,
    streaming: bool,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: Message::assistant(greeting),
            entries: Vec::new(),
            streaming: false,
        }
    }

    pub fn greeting(&self) -> &Message {
        &self.greeting
    }

    /// Conversation messages, greeting excluded
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Everything to display, greeting first
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        std::iter::once(&self.greeting).chain(self.entries.iter())
    }

    pub fn message_count(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// The message currently being streamed, if any
    pub fn in_progress(&self) -> Option<&Message> {
        if self.streaming {
            self.entries.last()
        } else {
            None
        }
    }

    /// Back to the greeting alone
    pub fn reset(&mut self) {
        self.replace(Vec::new());
    }

    pub fn replace(&mut self, messages: Vec<Message>) {
        self.entries = messages;
        self.streaming = false;
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.finish();
        self.entries.push(Message::user(text));
    }

    pub fn append_delta(&mut self, text: &str) {
        self.current_mut().content.push_str(text);
    }

    pub fn attach_sources(&mut self, sources: Vec<Source>) {
        self.current_mut().sources.extend(sources);
    }

    /// Finalize the in-progress message, if any.
    pub fn finish(&mut self) {
        self.streaming = false;
    }

    /// Append a complete synthetic assistant message.
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.finish();
        self.entries.push(Message::assistant(text));
    }

    /// The in-progress assistant message, opened on first use.
    fn current_mut(&mut self) -> &mut Message {
        if !self.streaming {
            self.entries.push(Message::assistant(String::new()));
            self.streaming = true;
        }
        let idx = self.entries.len() - 1;
        &mut self.entries[idx]
    }
}

impl TranscriptSink for Transcript {
    fn apply(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Reset { messages } => self.replace(messages),
            TranscriptEvent::UserMessage { text } => self.push_user(text),
            TranscriptEvent::AssistantDelta { text } => self.append_delta(&text),
            TranscriptEvent::SourcesAttached { sources } => self.attach_sources(sources),
            TranscriptEvent::AssistantFinished => self.finish(),
            TranscriptEvent::Notice { text } => self.push_notice(text),
        }
    }
}
