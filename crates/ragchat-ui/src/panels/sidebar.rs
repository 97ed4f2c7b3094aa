//! Sidebar: conversation list, new chat, document upload, logout.

use egui::{self, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    NewConversation,
    Select(String),
    Refresh,
    Upload,
    Logout,
}

pub fn sidebar_panel(ui: &mut egui::Ui, state: &UiState) -> Option<SidebarAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_SIDEBAR)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                let new_chat = ui.add_sized(
                    Vec2::new(ui.available_width(), 32.0),
                    egui::Button::new(RichText::new("+ New chat").color(BG_SECONDARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING),
                );
                if new_chat.clicked() {
                    action = Some(SidebarAction::NewConversation);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Conversations").color(TEXT_ON_DARK).strong());
                    if state.conversations_loading {
                        ui.spinner();
                    }
                });
                ui.separator();

                if let Some(err) = &state.conversations_error {
                    ui.label(RichText::new(err).color(ERROR).small());
                    if ui.small_button("Retry").clicked() {
                        action = Some(SidebarAction::Refresh);
                    }
                }

                let list_height = (ui.available_height() - 110.0).max(60.0);
                ScrollArea::vertical()
                    .max_height(list_height)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if state.conversations.is_empty() && !state.conversations_loading {
                            ui.label(RichText::new("No conversations yet").color(TEXT_SECONDARY).italics());
                        }
                        for conv in &state.conversations {
                            let active = state.active_conversation.as_deref() == Some(conv.id.as_str());
                            let row = ui.selectable_label(
                                active,
                                RichText::new(conv.label()).color(TEXT_ON_DARK),
                            );
                            if row.clicked() && !active {
                                action = Some(SidebarAction::Select(conv.id.clone()));
                            }
                            if !conv.created_at.is_empty() {
                                ui.label(RichText::new(conv.created_label()).color(TEXT_SECONDARY).small());
                            }
                        }
                    });

                ui.separator();

                let upload = ui.add_enabled(
                    !state.uploading,
                    egui::Button::new(RichText::new("Upload document").color(TEXT_PRIMARY))
                        .corner_radius(PANEL_ROUNDING),
                );
                if upload.clicked() {
                    action = Some(SidebarAction::Upload);
                }
                if let Some(status) = &state.upload_status {
                    let color = if status.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&status.message).color(color).small());
                }

                ui.add_space(8.0);
                if ui
                    .button(RichText::new("Logout").color(TEXT_PRIMARY))
                    .clicked()
                {
                    action = Some(SidebarAction::Logout);
                }
            });
        });

    action
}
