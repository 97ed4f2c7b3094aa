//! Settings panel: backend URL and the texts shown in the transcript.
//! Changes apply when the user clicks Save.

use egui::{self, RichText, Vec2};
use ragchat_types::{ChatError, Result, config::ClientConfig};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was edited but not saved yet
    Changed,
    /// The user clicked Save
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Debug, Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel against a draft of the config.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ClientConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            ui.label(RichText::new("Backend").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API Base URL").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::TextEdit::singleline(&mut config.api_base).hint_text("http://localhost:8000"))
                .changed()
            {
                changed = true;
            }
            ui.label(
                RichText::new("Chat, uploads and document links use this address.")
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            ui.label(RichText::new("Messages").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Greeting").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::TextEdit::multiline(&mut config.greeting).desired_rows(2))
                .changed()
            {
                changed = true;
            }

            ui.label(RichText::new("Error reply").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut config.failure_text).changed() {
                changed = true;
            }

            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(BG_SECONDARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }
                if ui.button("Defaults").clicked() {
                    *config = ClientConfig::default();
                    changed = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

/// Validate a config draft before it is saved.
pub fn validate_config(config: &ClientConfig) -> Result<()> {
    let base = config.api_base.trim();
    if base.is_empty() {
        return Err(ChatError::Config("API Base URL is required".to_string()));
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ChatError::Config(
            "API Base URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}
