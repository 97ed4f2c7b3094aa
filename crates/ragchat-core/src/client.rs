//! Chat client: every user-facing operation, wired to the backend port.
//!
//! Operations are futures spawned on the UI thread via
//! `wasm_bindgen_futures::spawn_local`. They publish their effects on the
//! event bus and the UI projects those events onto its own state. The client
//! is cheap to clone so each spawned operation owns a handle, and no
//! `RefCell` borrow is held across an await point.
//!
//! Every conversation switch and sign-out starts a new view. A reply or
//! history load only writes to the transcript while the view it started in
//! is still shown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ragchat_types::{
    ChatError, Result,
    auth::RegistrationForm,
    config::ClientConfig,
    conversation::{is_supported_document, SUPPORTED_EXTENSIONS},
    event::{ChatEvent, SignOutReason, TranscriptEvent},
    message::{ChatRequest, Message},
};
use crate::assembler::StreamAssembler;
use crate::event_bus::EventBus;
use crate::ports::{BackendPort, ChatReply, KeyValuePort};
use crate::session::Session;
use crate::transcript::TranscriptSink;

#[derive(Clone)]
pub struct ChatClient {
    config: Rc<ClientConfig>,
    backend: Rc<dyn BackendPort>,
    session: Session,
    active: Rc<RefCell<Option<String>>>,
    view: Rc<Cell<u64>>,
    events: EventBus,
}

impl ChatClient {
    pub fn new(
        config: ClientConfig,
        backend: Rc<dyn BackendPort>,
        store: Rc<dyn KeyValuePort>,
        events: EventBus,
    ) -> Self {
        let session = Session::restore(store, config.credential_key.clone());
        Self {
            config: Rc::new(config),
            backend,
            session,
            active: Rc::new(RefCell::new(None)),
            view: Rc::new(Cell::new(0)),
            events,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn active_conversation(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    // ─── Auth ────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let result = match self.backend.login(email.trim(), password).await {
            Ok(token) => self.session.sign_in(token),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            log::warn!("Login failed: {}", e);
            self.events.emit(ChatEvent::AuthFailed {
                message: e.user_message(),
            });
            return Err(e);
        }

        log::info!("Signed in");
        self.events.emit(ChatEvent::SignedIn);
        self.bootstrap().await;
        Ok(())
    }

    /// Validates locally first; a mismatched confirmation never reaches the
    /// backend.
    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        let result = match form.validate() {
            Ok(req) => self.backend.register(&req).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                log::info!("Registration accepted");
                self.events.emit(ChatEvent::Registered);
                Ok(())
            }
            Err(e) => {
                log::warn!("Registration failed: {}", e);
                self.events.emit(ChatEvent::AuthFailed {
                    message: e.user_message(),
                });
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        log::info!("Signing out");
        self.end_session(SignOutReason::Logout);
    }

    /// Stop operations still in flight on this client from touching the
    /// transcript. Used when the client is replaced.
    pub fn retire(&self) {
        log::debug!("Client retired");
        self.begin_view();
    }

    /// Initial load after sign-in: the conversation list, then the default
    /// history. Failures are already reported through events.
    pub async fn bootstrap(&self) {
        if let Err(e) = self.refresh_conversations().await {
            log::warn!("Conversation list unavailable: {}", e);
        }
        if !self.is_authenticated() {
            return;
        }
        if let Err(e) = self.load_default_history().await {
            log::warn!("Default history unavailable: {}", e);
        }
    }

    // ─── Conversations ───────────────────────────────────────

    /// Switch the transcript to another conversation, or to a fresh chat
    /// when `id` is `None`.
    pub async fn select_conversation(&self, id: Option<String>) -> Result<()> {
        *self.active.borrow_mut() = id.clone();
        let view = self.begin_view();
        self.events.emit(ChatEvent::ActiveConversation { id: id.clone() });

        let Some(id) = id else {
            self.reset_transcript(Vec::new());
            return Ok(());
        };

        let token = self.authorized(self.session.token())?;
        let result = self.authorized(self.backend.history(&token, Some(&id)).await);

        // The user may have picked another conversation meanwhile.
        if !self.owns_view(view) {
            log::debug!("Dropping stale history for {}", id);
            return result.map(|_| ());
        }

        match result {
            Ok(messages) => {
                log::info!("Loaded {} messages for conversation {}", messages.len(), id);
                self.reset_transcript(messages);
                Ok(())
            }
            Err(ChatError::Unauthorized) => Err(ChatError::Unauthorized),
            Err(e) => {
                log::error!("History load for {} failed: {}", id, e);
                self.reset_transcript(vec![Message::assistant(
                    self.config.history_failure_text.clone(),
                )]);
                Err(e)
            }
        }
    }

    pub async fn new_conversation(&self) -> Result<()> {
        let token = self.authorized(self.session.token())?;
        let id = match self.authorized(self.backend.create_conversation(&token).await) {
            Ok(id) => id,
            Err(e) => {
                if !e.is_unauthorized() {
                    self.events.emit(ChatEvent::Error {
                        message: format!("Could not create a conversation: {}", e.user_message()),
                    });
                }
                return Err(e);
            }
        };
        log::info!("Created conversation {}", id);
        self.select_conversation(Some(id)).await?;
        self.refresh_conversations().await
    }

    pub async fn refresh_conversations(&self) -> Result<()> {
        let token = self.authorized(self.session.token())?;
        self.events.emit(ChatEvent::ConversationsLoading);
        match self.authorized(self.backend.list_conversations(&token).await) {
            Ok(conversations) => {
                self.events.emit(ChatEvent::ConversationsLoaded { conversations });
                Ok(())
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    self.events.emit(ChatEvent::ConversationsFailed {
                        message: e.user_message(),
                    });
                }
                Err(e)
            }
        }
    }

    async fn load_default_history(&self) -> Result<()> {
        let view = self.view.get();
        let token = self.authorized(self.session.token())?;
        let messages = self.authorized(self.backend.history(&token, None).await)?;
        if self.owns_view(view) && self.active_conversation().is_none() {
            self.reset_transcript(messages);
        } else {
            log::debug!("Dropping default history, another conversation is shown");
        }
        Ok(())
    }

    // ─── Chat ────────────────────────────────────────────────

    /// Send one user message and fold the reply into the transcript.
    pub async fn send(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let token = self.authorized(self.session.token())?;
        let req = ChatRequest {
            message: text.to_string(),
            conversation_id: self.active_conversation(),
        };
        let sink = ViewSink {
            events: self.events.clone(),
            view: self.view.clone(),
            owned: self.view.get(),
        };

        self.events.emit(ChatEvent::SendStarted);
        self.events.emit(ChatEvent::Transcript(TranscriptEvent::UserMessage {
            text: req.message.clone(),
        }));

        let result = self.exchange(&token, &req, sink).await;
        if let Err(e) = &result {
            log::error!("Chat request failed: {}", e);
        }
        self.events.emit(ChatEvent::SendFinished);
        result
    }

    async fn exchange(&self, token: &str, req: &ChatRequest, mut sink: ViewSink) -> Result<()> {
        let reply = match self.authorized(self.backend.send_message(token, req).await) {
            Ok(reply) => reply,
            Err(e) => {
                if !e.is_unauthorized() {
                    sink.apply(TranscriptEvent::Notice {
                        text: self.config.failure_text.clone(),
                    });
                }
                return Err(e);
            }
        };

        match reply {
            ChatReply::Complete(response) => {
                let message = response.into_message();
                if message.content.is_empty() && message.sources.is_empty() {
                    log::warn!("Backend returned an empty answer");
                    return Ok(());
                }
                sink.apply(TranscriptEvent::AssistantDelta {
                    text: message.content,
                });
                if !message.sources.is_empty() {
                    sink.apply(TranscriptEvent::SourcesAttached {
                        sources: message.sources,
                    });
                }
                sink.apply(TranscriptEvent::AssistantFinished);
                Ok(())
            }
            ChatReply::Stream(body) => StreamAssembler::new(sink)
                .run(body, &self.config.failure_text)
                .await
                .map(|_| ()),
        }
    }

    // ─── Documents ───────────────────────────────────────────

    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        if !is_supported_document(file_name) {
            let e = ChatError::Validation(format!(
                "Unsupported file type. Accepted: {}",
                SUPPORTED_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{}", ext))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            self.events.emit(ChatEvent::UploadFailed {
                message: e.user_message(),
            });
            return Err(e);
        }

        let token = self.authorized(self.session.token())?;
        self.events.emit(ChatEvent::UploadStarted {
            file_name: file_name.to_string(),
        });
        match self.authorized(self.backend.upload_document(&token, file_name, bytes).await) {
            Ok(receipt) => {
                log::info!("Uploaded {} for indexing", receipt.filename);
                self.events.emit(ChatEvent::UploadFinished {
                    file_name: receipt.filename,
                });
                Ok(())
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    self.events.emit(ChatEvent::UploadFailed {
                        message: e.user_message(),
                    });
                }
                Err(e)
            }
        }
    }

    // ─── Helpers ─────────────────────────────────────────────

    /// Any 401 ends the session before the error is passed on.
    fn authorized<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(ChatError::Unauthorized) = &result {
            log::warn!("Credential rejected, returning to login");
            self.end_session(SignOutReason::Expired);
        }
        result
    }

    fn begin_view(&self) -> u64 {
        let next = self.view.get().wrapping_add(1);
        self.view.set(next);
        next
    }

    fn owns_view(&self, view: u64) -> bool {
        self.view.get() == view
    }

    fn end_session(&self, reason: SignOutReason) {
        self.session.sign_out();
        *self.active.borrow_mut() = None;
        self.begin_view();
        self.events.emit(ChatEvent::SignedOut { reason });
        self.reset_transcript(Vec::new());
    }

    fn reset_transcript(&self, messages: Vec<Message>) {
        self.events
            .emit(ChatEvent::Transcript(TranscriptEvent::Reset { messages }));
    }
}

/// Bus sink for one reply. Drops everything once the view the request was
/// sent from has been replaced.
struct ViewSink {
    events: EventBus,
    view: Rc<Cell<u64>>,
    owned: u64,
}

impl ViewSink {
    fn is_current(&self) -> bool {
        self.view.get() == self.owned
    }
}

impl TranscriptSink for ViewSink {
    fn apply(&mut self, event: TranscriptEvent) {
        if self.is_current() {
            self.events.emit(ChatEvent::Transcript(event));
        } else {
            log::debug!("Dropping reply update for a conversation no longer shown");
        }
    }

    fn progress(&mut self, title: String) {
        if self.is_current() {
            self.events.emit(ChatEvent::Progress { title });
        }
    }
}
