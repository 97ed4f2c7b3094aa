use serde::{Deserialize, Serialize};
use crate::conversation::Conversation;
use crate::message::{Message, Source};

/// Events emitted by the chat client.
/// The UI drains these each frame and projects them onto its state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A token was obtained and stored
    SignedIn,

    /// The credential was cleared
    SignedOut { reason: SignOutReason },

    /// Registration succeeded; the user should now sign in
    Registered,

    /// Login or registration failed (validation or backend `detail`)
    AuthFailed { message: String },

    /// A change to the active transcript
    Transcript(TranscriptEvent),

    /// A send started; the send affordance must be disabled
    SendStarted,

    /// The send finished, successfully or not
    SendFinished,

    /// Retrieval progress reported by the backend during a stream
    Progress { title: String },

    /// The active conversation changed (`None` = fresh chat)
    ActiveConversation { id: Option<String> },

    ConversationsLoading,
    ConversationsLoaded { conversations: Vec<Conversation> },
    ConversationsFailed { message: String },

    UploadStarted { file_name: String },
    UploadFinished { file_name: String },
    UploadFailed { message: String },

    /// An operation failed in a way not covered above
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignOutReason {
    /// The user clicked logout
    Logout,
    /// The backend rejected the credential
    Expired,
}

/// Transcript mutations, in the order they must be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TranscriptEvent {
    /// Replace all entries (the greeting is kept in front)
    Reset { messages: Vec<Message> },
    /// The user sent a message
    UserMessage { text: String },
    /// Text appended to the in-progress assistant message
    AssistantDelta { text: String },
    /// Sources attached to the in-progress assistant message
    SourcesAttached { sources: Vec<Source> },
    /// The in-progress assistant message is final
    AssistantFinished,
    /// A synthetic assistant message, e.g. a fixed error text
    Notice { text: String },
}
