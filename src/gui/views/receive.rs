//! Receive modal: wallet address, copy button and QR code.

use crate::gui::app::{UiAction, WalletApp};
use crate::receive::ReceiveImage;
use eframe::egui::{self, RichText};

const QR_SIZE: f32 = 224.0;

impl WalletApp {
    pub(crate) fn view_receive_modal(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };
        let view = dashboard.view();
        if !view.modals.receive_open {
            return;
        }
        let theme = &self.theme;
        let address = dashboard.wallet_address();

        let mut open = true;
        egui::Window::new("Receive Bitcoin")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(QR_SIZE, QR_SIZE), egui::Sense::hover());
                    match (&view.receive_image, &self.qr_texture) {
                        (ReceiveImage::Available(_), Some(texture)) => {
                            egui::Image::new(texture)
                                .fit_to_exact_size(rect.size())
                                .paint_at(ui, rect);
                        }
                        (ReceiveImage::Failed, _) | (ReceiveImage::Available(_), None) => {
                            ui.painter().rect_filled(rect, 8.0, theme.surface_hover);
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                "QR code unavailable",
                                egui::FontId::proportional(15.0),
                                theme.text_secondary,
                            );
                        }
                        (ReceiveImage::NotYetAvailable, _) => {
                            ui.painter().rect_filled(rect, 8.0, theme.surface_hover);
                            ui.put(
                                egui::Rect::from_center_size(rect.center(), egui::vec2(32.0, 32.0)),
                                egui::Spinner::new().size(32.0),
                            );
                        }
                    }

                    ui.add_space(theme.spacing_md);
                    ui.label(RichText::new("Your Bitcoin address").color(theme.text_secondary));
                    ui.label(RichText::new(address).monospace().color(theme.text_primary));
                    ui.add_space(theme.spacing_sm);
                    ui.horizontal(|ui| {
                        if ui.add(theme.button_primary("📋 Copy address")).clicked() {
                            actions.push(UiAction::CopyToClipboard {
                                text: address.to_string(),
                                what: "Address",
                            });
                        }
                        if ui
                            .link(RichText::new("View on explorer").color(theme.link))
                            .clicked()
                        {
                            actions.push(UiAction::OpenUrl(self.config.address_explorer_url(address)));
                        }
                    });
                    ui.add_space(theme.spacing_sm);
                    ui.label(
                        RichText::new("Only send Bitcoin (BTC) to this address.")
                            .small()
                            .color(theme.warning),
                    );
                });
            });

        if !open {
            actions.push(UiAction::CloseReceive);
        }
    }
}
