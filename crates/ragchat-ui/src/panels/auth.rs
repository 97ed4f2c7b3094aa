//! Login and registration screens, shown while signed out.

use egui::{self, RichText, Vec2};
use ragchat_types::auth::{LoginForm, RegistrationForm};
use crate::state::{AuthView, UiState};
use crate::theme::*;

/// A validated form the caller should submit to the backend
#[derive(Debug, Clone)]
pub enum AuthAction {
    Login(LoginForm),
    Register(RegistrationForm),
}

pub fn auth_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<AuthAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.15);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(320.0);
                action = match state.auth_view {
                    AuthView::Login => login_form(ui, state),
                    AuthView::Register => register_form(ui, state),
                };

                if let Some(notice) = &state.auth_notice {
                    ui.add_space(6.0);
                    ui.label(RichText::new(notice).color(SUCCESS).small());
                }
                if let Some(err) = &state.auth_error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(err).color(ERROR).small());
                }
                if state.auth_pending {
                    ui.add_space(6.0);
                    ui.spinner();
                }
            });
    });

    action
}

fn login_form(ui: &mut egui::Ui, state: &mut UiState) -> Option<AuthAction> {
    ui.heading(RichText::new("Sign in").color(TEXT_PRIMARY).strong());
    ui.add_space(8.0);

    field(ui, "Email");
    ui.add(egui::TextEdit::singleline(&mut state.login_form.email).hint_text("you@example.com"));
    field(ui, "Password");
    let password = ui.add(egui::TextEdit::singleline(&mut state.login_form.password).password(true));

    ui.add_space(10.0);
    let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let submit = ui.add_enabled(!state.auth_pending, primary_button("Sign in"));

    ui.add_space(6.0);
    if ui.link("No account yet? Register").clicked() {
        state.switch_auth_view(AuthView::Register);
        return None;
    }

    if enter || submit.clicked() {
        return state.submit_login().map(AuthAction::Login);
    }
    None
}

fn register_form(ui: &mut egui::Ui, state: &mut UiState) -> Option<AuthAction> {
    ui.heading(RichText::new("Create an account").color(TEXT_PRIMARY).strong());
    ui.add_space(8.0);

    let form = &mut state.register_form;
    field(ui, "Email");
    ui.text_edit_singleline(&mut form.email);
    field(ui, "Username");
    ui.text_edit_singleline(&mut form.username);
    field(ui, "Password");
    ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
    field(ui, "Confirm password");
    ui.add(egui::TextEdit::singleline(&mut form.confirm_password).password(true));

    ui.add_space(10.0);
    let submit = ui.add_enabled(!state.auth_pending, primary_button("Register"));

    ui.add_space(6.0);
    if ui.link("Already registered? Sign in").clicked() {
        state.switch_auth_view(AuthView::Login);
        return None;
    }

    if submit.clicked() {
        return state.submit_registration().map(AuthAction::Register);
    }
    None
}

fn field(ui: &mut egui::Ui, label: &str) {
    ui.add_space(4.0);
    ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
}

fn primary_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(text).color(BG_SECONDARY).strong())
        .fill(ACCENT)
        .corner_radius(PANEL_ROUNDING)
        .min_size(Vec2::new(120.0, 28.0))
}
