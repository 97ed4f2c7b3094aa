//! Main egui application: composes the panels and dispatches client operations.

use std::future::Future;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use ragchat_core::client::ChatClient;
use ragchat_core::event_bus::EventBus;
use ragchat_core::ports::KeyValuePort;
use ragchat_core::settings::{load_config, save_config};
use ragchat_platform::backend::HttpBackend;
use ragchat_platform::file_picker::pick_file;
use ragchat_platform::storage::auto_detect_storage;
use ragchat_types::config::ClientConfig;
use ragchat_types::conversation::accept_attribute;
use ragchat_types::event::ChatEvent;
use ragchat_types::Result;
use ragchat_ui::panels::auth::{auth_panel, AuthAction};
use ragchat_ui::panels::chat::chat_panel;
use ragchat_ui::panels::settings::{settings_panel, validate_config, SaveFeedback, SettingsAction};
use ragchat_ui::panels::sidebar::{sidebar_panel, SidebarAction};
use ragchat_ui::state::UiState;
use ragchat_ui::theme;

pub struct ChatApp {
    ui_state: UiState,
    config: ClientConfig,
    /// Edited in the settings panel, applied on save
    settings_draft: ClientConfig,
    save_feedback: Option<SaveFeedback>,
    event_bus: EventBus,
    store: Rc<dyn KeyValuePort>,
    client: ChatClient,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let store = auto_detect_storage();
        let config = load_config(store.as_ref());
        let event_bus = EventBus::new();
        let client = Self::build_client(&config, store.clone(), event_bus.clone());

        let mut ui_state = UiState::new(&config);
        ui_state.authenticated = client.is_authenticated();

        let app = Self {
            ui_state,
            settings_draft: config.clone(),
            config,
            save_feedback: None,
            event_bus,
            store,
            client,
            first_frame: true,
        };

        if app.ui_state.authenticated {
            app.spawn(&cc.egui_ctx, "bootstrap", |client| async move {
                client.bootstrap().await;
                Ok(())
            });
        }
        app
    }

    fn build_client(config: &ClientConfig, store: Rc<dyn KeyValuePort>, events: EventBus) -> ChatClient {
        let backend = Rc::new(HttpBackend::new(&config.api_base));
        log::info!("Backend: {}", backend.base_url());
        ChatClient::new(config.clone(), backend, store, events)
    }

    /// Run one client operation on the UI thread's executor. The client
    /// reports outcomes through the event bus; the error is only logged here.
    fn spawn<F, Fut>(&self, ctx: &egui::Context, label: &'static str, op: F)
    where
        F: FnOnce(ChatClient) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let client = self.client.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = op(client).await {
                log::debug!("{} ended with: {}", label, e);
            }
            ctx.request_repaint();
        });
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        if let Err(e) = validate_config(&self.settings_draft) {
            self.save_feedback = Some(SaveFeedback {
                message: e.user_message(),
                success: false,
            });
            return;
        }

        let mut config = self.settings_draft.clone();
        config.api_base = config.api_base.trim().trim_end_matches('/').to_string();
        let saved = save_config(self.store.as_ref(), &config);
        self.save_feedback = Some(match &saved {
            Ok(()) => SaveFeedback {
                message: "Saved".to_string(),
                success: true,
            },
            Err(e) => SaveFeedback {
                message: format!("Applied, but not persisted: {}", e),
                success: false,
            },
        });

        self.config = config;
        self.settings_draft = self.config.clone();

        // Operations of the old client keep running; they report to the old
        // bus, which nothing drains any more.
        self.client.retire();
        self.event_bus = EventBus::new();
        self.client = Self::build_client(&self.config, self.store.clone(), self.event_bus.clone());
        self.ui_state.restart(&self.config);
        if self.client.is_authenticated() {
            self.spawn(ctx, "bootstrap", |client| async move {
                client.bootstrap().await;
                Ok(())
            });
        }
    }

    fn dispatch_auth(&self, action: AuthAction, ctx: &egui::Context) {
        match action {
            AuthAction::Login(form) => self.spawn(ctx, "login", move |client| async move {
                client.login(&form.email, &form.password).await
            }),
            AuthAction::Register(form) => self.spawn(ctx, "register", move |client| async move {
                client.register(&form).await
            }),
        }
    }

    fn dispatch_sidebar(&self, action: SidebarAction, ctx: &egui::Context) {
        match action {
            SidebarAction::NewConversation => {
                self.spawn(ctx, "new conversation", |client| async move {
                    client.new_conversation().await
                })
            }
            SidebarAction::Select(id) => self.spawn(ctx, "select conversation", move |client| async move {
                client.select_conversation(Some(id)).await
            }),
            SidebarAction::Refresh => self.spawn(ctx, "refresh conversations", |client| async move {
                client.refresh_conversations().await
            }),
            SidebarAction::Upload => {
                let events = self.event_bus.clone();
                self.spawn(ctx, "upload", move |client| async move {
                    match pick_file(&accept_attribute()).await {
                        Ok(Some(file)) => client.upload(&file.name, file.bytes).await,
                        Ok(None) => Ok(()),
                        Err(e) => {
                            events.emit(ChatEvent::UploadFailed {
                                message: e.user_message(),
                            });
                            Err(e)
                        }
                    }
                })
            }
            SidebarAction::Logout => self.client.logout(),
        }
    }

    fn dispatch_message(&self, text: String, ctx: &egui::Context) {
        self.spawn(ctx, "send", move |client| async move { client.send(&text).await });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Document Assistant")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!("Backend: {}", self.config.api_base))
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                        self.settings_draft = self.config.clone();
                        self.save_feedback = None;
                    }
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let mut save = false;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings_panel(ui, &mut self.settings_draft, self.save_feedback.as_ref()) {
                        SettingsAction::SaveClicked => save = true,
                        SettingsAction::Changed => self.save_feedback = None,
                        SettingsAction::None => {}
                    }
                });
            if save {
                self.apply_settings(ctx);
            }
        }

        // ── Signed out: auth screens only ────────────────────
        if !self.ui_state.authenticated {
            let mut action = None;
            CentralPanel::default().show(ctx, |ui| {
                action = auth_panel(ui, &mut self.ui_state);
            });
            if let Some(action) = action {
                self.dispatch_auth(action, ctx);
            }
            return;
        }

        // ── Conversation sidebar ─────────────────────────────
        let mut sidebar_action = None;
        SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(240.0)
            .show(ctx, |ui| {
                sidebar_action = sidebar_panel(ui, &self.ui_state);
            });
        if let Some(action) = sidebar_action {
            self.dispatch_sidebar(action, ctx);
        }

        // ── Chat ─────────────────────────────────────────────
        let mut submitted = None;
        CentralPanel::default().show(ctx, |ui| {
            submitted = chat_panel(ui, &mut self.ui_state, &self.config);
        });
        if let Some(text) = submitted {
            self.dispatch_message(text, ctx);
        }
    }
}
