//! UI-level state that drives rendering.
//! This is a read-only projection of the chat client's state,
//! updated each frame by draining the EventBus.

use ragchat_core::transcript::{Transcript, TranscriptSink};
use ragchat_types::auth::{LoginForm, RegistrationForm};
use ragchat_types::config::ClientConfig;
use ragchat_types::conversation::Conversation;
use ragchat_types::event::{ChatEvent, SignOutReason};

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";
pub const REGISTERED_NOTICE: &str = "Registration successful. Please sign in.";
pub const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Which auth screen is shown while signed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    Register,
}

/// Outcome line under the upload button
#[derive(Debug, Clone, PartialEq)]
pub struct UploadStatus {
    pub message: String,
    pub success: bool,
}

/// State visible to UI panels
pub struct UiState {
    /// Greeting plus the active conversation's messages
    pub transcript: Transcript,
    /// Draft in the message input
    pub input_text: String,
    pub authenticated: bool,
    pub auth_view: AuthView,
    pub login_form: LoginForm,
    pub register_form: RegistrationForm,
    /// Inline error on the auth screen
    pub auth_error: Option<String>,
    /// Inline notice on the login screen (registered, session expired)
    pub auth_notice: Option<String>,
    /// A login or registration request is in flight
    pub auth_pending: bool,
    /// A chat request is in flight; sending is disabled
    pub sending: bool,
    pub status_text: String,
    pub conversations: Vec<Conversation>,
    pub conversations_loading: bool,
    pub conversations_error: Option<String>,
    pub active_conversation: Option<String>,
    pub uploading: bool,
    pub upload_status: Option<UploadStatus>,
    pub show_settings: bool,
}

impl UiState {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            transcript: Transcript::new(config.greeting.clone()),
            input_text: String::new(),
            authenticated: false,
            auth_view: AuthView::Login,
            login_form: LoginForm::default(),
            register_form: RegistrationForm::default(),
            auth_error: None,
            auth_notice: None,
            auth_pending: false,
            sending: false,
            status_text: "Ready".to_string(),
            conversations: Vec::new(),
            conversations_loading: false,
            conversations_error: None,
            active_conversation: None,
            uploading: false,
            upload_status: None,
            show_settings: false,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::SignedIn => {
                    self.authenticated = true;
                    self.auth_pending = false;
                    self.auth_error = None;
                    self.auth_notice = None;
                    self.login_form.password.clear();
                }
                ChatEvent::SignedOut { reason } => {
                    self.authenticated = false;
                    self.auth_view = AuthView::Login;
                    self.auth_pending = false;
                    self.auth_error = None;
                    self.auth_notice = match reason {
                        SignOutReason::Expired => Some(SESSION_EXPIRED_NOTICE.to_string()),
                        SignOutReason::Logout => None,
                    };
                    self.sending = false;
                    self.uploading = false;
                    self.upload_status = None;
                    self.conversations.clear();
                    self.conversations_error = None;
                    self.active_conversation = None;
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::Registered => {
                    self.auth_view = AuthView::Login;
                    self.auth_pending = false;
                    self.auth_error = None;
                    self.auth_notice = Some(REGISTERED_NOTICE.to_string());
                    self.login_form.email = self.register_form.email.trim().to_string();
                    self.register_form.clear();
                }
                ChatEvent::AuthFailed { message } => {
                    self.auth_pending = false;
                    self.auth_error = Some(message);
                }
                ChatEvent::Transcript(event) => {
                    self.transcript.apply(event);
                }
                ChatEvent::SendStarted => {
                    self.sending = true;
                    self.status_text = "Thinking...".to_string();
                }
                ChatEvent::SendFinished => {
                    self.sending = false;
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::Progress { title } => {
                    self.status_text = title;
                }
                ChatEvent::ActiveConversation { id } => {
                    // Switching conversations discards the draft.
                    self.input_text.clear();
                    self.active_conversation = id;
                }
                ChatEvent::ConversationsLoading => {
                    self.conversations_loading = true;
                    self.conversations_error = None;
                }
                ChatEvent::ConversationsLoaded { conversations } => {
                    log::debug!("{} conversations listed", conversations.len());
                    self.conversations_loading = false;
                    self.conversations = conversations;
                }
                ChatEvent::ConversationsFailed { message } => {
                    self.conversations_loading = false;
                    self.conversations_error = Some(message);
                }
                ChatEvent::UploadStarted { file_name } => {
                    self.uploading = true;
                    self.upload_status = Some(UploadStatus {
                        message: format!("Uploading {}...", file_name),
                        success: true,
                    });
                }
                ChatEvent::UploadFinished { file_name } => {
                    self.uploading = false;
                    self.upload_status = Some(UploadStatus {
                        message: format!("{} uploaded, indexing started", file_name),
                        success: true,
                    });
                }
                ChatEvent::UploadFailed { message } => {
                    self.uploading = false;
                    self.upload_status = Some(UploadStatus {
                        message,
                        success: false,
                    });
                }
                ChatEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                }
            }
        }
    }

    /// Forget everything tied to the previous backend. In-flight
    /// operations of the replaced client no longer report here.
    pub fn restart(&mut self, config: &ClientConfig) {
        self.transcript = Transcript::new(config.greeting.clone());
        self.active_conversation = None;
        self.sending = false;
        self.uploading = false;
        self.upload_status = None;
        self.conversations_loading = false;
        self.conversations_error = None;
        self.status_text = "Ready".to_string();
    }

    pub fn is_busy(&self) -> bool {
        self.sending || self.uploading || self.auth_pending
    }

    pub fn can_send(&self) -> bool {
        self.authenticated && !self.sending && !self.input_text.trim().is_empty()
    }

    /// Take the draft for sending, or `None` when sending is not allowed.
    pub fn take_input(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = self.input_text.trim().to_string();
        self.input_text.clear();
        Some(text)
    }

    /// Login form ready to submit, or an inline error.
    pub fn submit_login(&mut self) -> Option<LoginForm> {
        if self.auth_pending {
            return None;
        }
        let form = &self.login_form;
        if form.email.trim().is_empty() || form.password.is_empty() {
            self.auth_error = Some(MISSING_CREDENTIALS.to_string());
            return None;
        }
        self.auth_error = None;
        self.auth_notice = None;
        self.auth_pending = true;
        Some(self.login_form.clone())
    }

    /// Registration form ready to submit. A password mismatch is reported
    /// inline and nothing is returned.
    pub fn submit_registration(&mut self) -> Option<RegistrationForm> {
        if self.auth_pending {
            return None;
        }
        if let Err(e) = self.register_form.validate() {
            self.auth_error = Some(e.user_message());
            return None;
        }
        self.auth_error = None;
        self.auth_pending = true;
        Some(self.register_form.clone())
    }

    pub fn switch_auth_view(&mut self, view: AuthView) {
        log::debug!("Auth view: {:?}", view);
        self.auth_view = view;
        self.auth_error = None;
        self.auth_notice = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}
