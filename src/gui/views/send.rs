//! Send modal
//!
//! Validates a recipient and amount against the loaded balance and shows a
//! review. Broadcasting is not available from the dashboard.

use crate::gui::app::{UiAction, WalletApp};
use crate::utils::{format_btc, format_usd};
use eframe::egui::{self, RichText};

impl WalletApp {
    pub(crate) fn view_send_modal(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };
        let view = dashboard.view();
        if !view.modals.send_open {
            return;
        }
        let theme = self.theme;
        let balance = view.effective_balance();
        let rate = view.effective_rate();
        let form = &mut self.send_form;

        let mut open = true;
        egui::Window::new("Send Bitcoin")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Available: {} BTC", format_btc(balance)))
                        .color(theme.text_secondary),
                );
                ui.add_space(theme.spacing_sm);

                if let Some(review) = &form.review {
                    egui::Grid::new("send_review")
                        .num_columns(2)
                        .spacing([theme.spacing_md, theme.spacing_xs])
                        .show(ui, |ui| {
                            ui.label(RichText::new("To").color(theme.text_secondary));
                            ui.label(RichText::new(&review.recipient).monospace());
                            ui.end_row();

                            ui.label(RichText::new("Amount").color(theme.text_secondary));
                            let usd = rate
                                .map(|r| format!(" (≈ ${})", format_usd(review.amount * r)))
                                .unwrap_or_default();
                            ui.label(format!("{} BTC{}", format_btc(review.amount), usd));
                            ui.end_row();

                            ui.label(RichText::new("Remaining").color(theme.text_secondary));
                            ui.label(format!("{} BTC", format_btc(review.remaining)));
                            ui.end_row();
                        });
                    ui.add_space(theme.spacing_sm);
                    ui.label(
                        RichText::new("Sending is disabled in this read-only wallet view.")
                            .color(theme.warning),
                    );
                    ui.add_space(theme.spacing_sm);
                    ui.horizontal(|ui| {
                        if ui.add(theme.button_secondary("Edit")).clicked() {
                            form.review = None;
                        }
                        if ui.add(theme.button_primary("Done")).clicked() {
                            actions.push(UiAction::CloseSend);
                        }
                    });
                    return;
                }

                ui.label(RichText::new("Recipient address").color(theme.text_secondary));
                ui.add(
                    egui::TextEdit::singleline(&mut form.draft.recipient)
                        .hint_text("bc1q…")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(theme.spacing_sm);

                ui.label(RichText::new("Amount (BTC)").color(theme.text_secondary));
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut form.draft.amount)
                            .hint_text("0.00000000")
                            .desired_width(200.0),
                    );
                    if ui.small_button("Max").clicked() {
                        form.draft.amount = format_btc(balance);
                    }
                });

                if let Some(error) = &form.error {
                    ui.add_space(theme.spacing_xs);
                    ui.label(RichText::new(error).color(theme.error));
                }

                ui.add_space(theme.spacing_md);
                if ui.add(theme.button_large("Review")).clicked() {
                    match form.draft.validate(balance) {
                        Ok(request) => {
                            tracing::info!(
                                "Send draft reviewed: {} BTC to {}",
                                format_btc(request.amount),
                                request.recipient
                            );
                            form.error = None;
                            form.review = Some(request);
                        }
                        Err(e) => form.error = Some(e.to_string()),
                    }
                }
            });

        if !open {
            actions.push(UiAction::CloseSend);
        }
    }
}
