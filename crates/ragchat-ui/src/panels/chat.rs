//! Chat panel: the transcript with citations, and the message input.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use ragchat_core::citation::format_with_citation;
use ragchat_types::config::ClientConfig;
use ragchat_types::message::{Message, Role};
use crate::state::UiState;
use crate::theme::*;

/// Render the chat panel. Returns Some(message) when the user submits input.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState, config: &ClientConfig) -> Option<String> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Chat").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.sending { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                ui.separator();

                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        let in_progress = state.transcript.in_progress();
                        for msg in state.transcript.iter() {
                            let streaming = in_progress.is_some_and(|m| std::ptr::eq(m, msg));
                            render_message(ui, msg, streaming, config);
                            ui.add_space(4.0);
                        }
                    });

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Ask about your documents...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));
                    let response = ui.add_enabled(!state.sending, input);

                    let send_enabled = state.can_send();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(BG_SECONDARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter || send_btn.clicked() {
                        submitted = state.take_input();
                        if submitted.is_some() {
                            response.request_focus();
                        }
                    }
                });
            });
        });

    submitted
}

fn render_message(ui: &mut egui::Ui, msg: &Message, streaming: bool, config: &ClientConfig) {
    let (label, label_color, bg) = match msg.role {
        Role::User => ("You", ACCENT, USER_BUBBLE),
        Role::Assistant => ("Assistant", SUCCESS, BG_SECONDARY),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());

            if msg.role == Role::User {
                ui.label(RichText::new(&msg.content).color(TEXT_PRIMARY));
                return;
            }

            let formatted = format_with_citation(&msg.content, &msg.sources);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(formatted.text.as_ref()).color(TEXT_PRIMARY));
                if streaming {
                    ui.label(RichText::new("▌").color(ACCENT).strong());
                }
                if let Some(citation) = &formatted.citation {
                    let url = config.resolve_url(&citation.view_path);
                    ui.add(
                        egui::Hyperlink::from_label_and_url(
                            RichText::new(citation.label()).color(CITATION).small(),
                            url,
                        )
                        .open_in_new_tab(true),
                    );
                }
            });
        });
}
