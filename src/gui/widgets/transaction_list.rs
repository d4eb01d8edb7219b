//! Transaction list widget
//! Renders ledger entries newest first, with per-row details and explorer links

use crate::config::Config;
use crate::gui::helpers::{skeleton_bar, status_color, status_label};
use crate::gui::theme::AppTheme;
use crate::types::Transaction;
use crate::utils::{format_btc, format_signed_btc, shorten_middle};
use eframe::egui::{self, RichText};

const SKELETON_ROWS: usize = 5;

/// What the user asked for while interacting with the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionListAction {
    OpenExplorer(String),
    CopyHash(String),
}

/// Stateless transaction list. `None` renders the loading skeleton.
pub struct TransactionList<'a> {
    transactions: Option<&'a [Transaction]>,
    config: &'a Config,
    theme: &'a AppTheme,
}

impl<'a> TransactionList<'a> {
    pub fn new(transactions: Option<&'a [Transaction]>, config: &'a Config, theme: &'a AppTheme) -> Self {
        Self {
            transactions,
            config,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<TransactionListAction> {
        let mut action = None;
        self.theme.frame_card().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new("Recent Activity")
                    .size(18.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_sm);

            match self.transactions {
                None => self.show_skeleton(ui),
                Some([]) => {
                    ui.label(RichText::new("No transactions yet.").color(self.theme.text_secondary));
                }
                Some(transactions) => {
                    for (i, tx) in transactions.iter().enumerate() {
                        if i > 0 {
                            ui.separator();
                        }
                        if let Some(a) = self.show_row(ui, tx) {
                            action = Some(a);
                        }
                    }
                }
            }
        });
        action
    }

    fn show_skeleton(&self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        for _ in 0..SKELETON_ROWS {
            ui.horizontal(|ui| {
                skeleton_bar(ui, self.theme, 40.0, 40.0);
                ui.vertical(|ui| {
                    skeleton_bar(ui, self.theme, width * 0.4, 14.0);
                    skeleton_bar(ui, self.theme, width * 0.25, 12.0);
                });
            });
            ui.add_space(self.theme.spacing_sm);
        }
    }

    fn show_row(&self, ui: &mut egui::Ui, tx: &Transaction) -> Option<TransactionListAction> {
        let mut action = None;
        let amount_color = if tx.is_outflow() {
            self.theme.outflow
        } else {
            self.theme.inflow
        };
        let arrow = if tx.is_outflow() { "↑" } else { "↓" };

        ui.horizontal(|ui| {
            ui.label(RichText::new(arrow).size(22.0).color(amount_color));
            ui.vertical(|ui| {
                ui.label(RichText::new(&tx.description).strong().color(self.theme.text_primary));
                ui.label(
                    RichText::new(format!(
                        "{} {} · {}",
                        tx.date.format("%b %d, %Y"),
                        tx.time.format("%H:%M"),
                        tx.category
                    ))
                    .small()
                    .color(self.theme.text_secondary),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!("{} BTC", format_signed_btc(tx.amount)))
                            .monospace()
                            .color(amount_color),
                    );
                    ui.label(
                        RichText::new(status_label(tx.status))
                            .small()
                            .color(status_color(tx.status, self.theme)),
                    );
                });
            });
        });

        let has_details = tx.fee.is_some() || tx.counterparty.is_some() || tx.hash.is_some();
        if has_details {
            egui::CollapsingHeader::new(RichText::new("Details").small().color(self.theme.text_secondary))
                .id_source(("tx_details", tx.id.as_str()))
                .show(ui, |ui| {
                    egui::Grid::new(("tx_detail_grid", tx.id.as_str()))
                        .num_columns(2)
                        .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                        .show(ui, |ui| {
                            if let Some(fee) = tx.fee {
                                ui.label(RichText::new("Network fee").color(self.theme.text_secondary));
                                ui.label(RichText::new(format!("{} BTC", format_btc(fee))).monospace());
                                ui.end_row();
                            }
                            if let Some(counterparty) = &tx.counterparty {
                                let label = if tx.is_outflow() { "To" } else { "From" };
                                ui.label(RichText::new(label).color(self.theme.text_secondary));
                                ui.label(RichText::new(shorten_middle(counterparty, 10)).monospace())
                                    .on_hover_text(counterparty.as_str());
                                ui.end_row();
                            }
                            if let Some(hash) = &tx.hash {
                                ui.label(RichText::new("Hash").color(self.theme.text_secondary));
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(shorten_middle(hash, 8)).monospace());
                                    if ui.small_button("📋").on_hover_text("Copy hash").clicked() {
                                        action = Some(TransactionListAction::CopyHash(hash.clone()));
                                    }
                                    if ui
                                        .link(RichText::new("View on explorer").color(self.theme.link))
                                        .clicked()
                                    {
                                        action = Some(TransactionListAction::OpenExplorer(
                                            self.config.tx_explorer_url(hash),
                                        ));
                                    }
                                });
                                ui.end_row();
                            }
                        });
                });
        }
        action
    }
}
