//! Login view implementation
//!
//! Email plus two-factor code. Verification runs as a background job so the
//! frame never blocks on the authenticator.

use crate::gui::app::WalletApp;
use crate::gui::async_job::AsyncJob;
use crate::gui::theme::AppTheme;
use crate::types::UserIdentity;
use eframe::egui::{self, RichText};
use std::sync::Arc;

impl WalletApp {
    pub(crate) fn view_login(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let busy = self.login.job.is_some();

        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_lg * 2.0);
            let width = AppTheme::responsive_width(ui, 320.0, 400.0, 400.0);
            ui.allocate_ui(egui::vec2(width, 0.0), |ui| {
                theme.frame_card().show(ui, |ui| {
                    ui.set_width(width);
                    ui.label(RichText::new("Welcome back").size(24.0).strong());
                    ui.label(
                        RichText::new("Sign in to your BitPrivacy wallet")
                            .color(theme.text_secondary),
                    );
                    ui.add_space(theme.spacing_md);

                    ui.label(RichText::new("Email").color(theme.text_secondary));
                    ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.login.email)
                            .hint_text("you@example.com")
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(theme.spacing_sm);

                    ui.label(RichText::new("2FA code").color(theme.text_secondary));
                    let code = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.login.code)
                            .hint_text("123456")
                            .desired_width(f32::INFINITY),
                    );
                    let submitted = code.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    if let Some(error) = &self.login.error {
                        ui.add_space(theme.spacing_xs);
                        ui.label(RichText::new(error).color(theme.error));
                    }

                    ui.add_space(theme.spacing_md);
                    if busy {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Verifying…").color(theme.text_secondary));
                        });
                    } else if ui.add(theme.button_large("Verify & Sign In")).clicked() || submitted {
                        self.start_sign_in();
                    }
                });
            });
        });
    }

    fn start_sign_in(&mut self) {
        let identity = match UserIdentity::parse(&self.login.email) {
            Ok(identity) => identity,
            Err(e) => {
                self.login.error = Some(e.to_string());
                return;
            }
        };
        let code = self.login.code.trim().to_string();
        if code.is_empty() {
            self.login.error = Some("Enter the code from your authenticator app.".to_string());
            return;
        }

        self.login.error = None;
        let authenticator = Arc::clone(&self.authenticator);
        self.login.job = Some(AsyncJob::spawn(&self.runtime, async move {
            let verified = authenticator.verify_code(&identity, &code).await?;
            Ok(verified.then_some(identity))
        }));
    }
}
