//! Dashboard view implementation
//!
//! Balance card, recent activity and the spending insights panel, or a
//! single error page when the ledger could not be loaded.

use crate::dashboard::{InsightsState, ViewState};
use crate::gui::app::{UiAction, WalletApp};
use crate::gui::helpers::{render_markdown, skeleton_bar};
use crate::gui::theme::AppTheme;
use crate::gui::widgets::TransactionList;
use crate::utils::{format_btc, format_usd};
use eframe::egui::{self, RichText};

impl WalletApp {
    /// Main dashboard view
    pub(crate) fn view_dashboard(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };
        let view = dashboard.view();
        let theme = &self.theme;

        if let Some(error) = view.error() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(error).size(18.0).color(theme.error));
            });
            return;
        }

        ui.add_space(theme.spacing_lg);
        let width = ui.available_width().min(960.0);
        ui.vertical_centered(|ui| {
            ui.set_max_width(width);

            render_balance_card(ui, theme, view, actions);
            ui.add_space(theme.spacing_lg);

            if let Some(action) = TransactionList::new(view.transactions(), &self.config, theme).show(ui) {
                actions.push(action.into());
            }
            ui.add_space(theme.spacing_lg);

            render_insights(ui, theme, view, actions);
            ui.add_space(theme.spacing_lg);
        });
    }
}

fn render_balance_card(ui: &mut egui::Ui, theme: &AppTheme, view: &ViewState, actions: &mut Vec<UiAction>) {
    theme.frame_card().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            if view.is_loading() {
                let width = ui.available_width();
                skeleton_bar(ui, theme, width / 3.0, 20.0);
                ui.add_space(theme.spacing_xs);
                skeleton_bar(ui, theme, width * 0.75, 48.0);
                ui.add_space(theme.spacing_xs);
                skeleton_bar(ui, theme, width / 2.0, 24.0);
                ui.add_space(theme.spacing_md);
                ui.horizontal(|ui| {
                    skeleton_bar(ui, theme, theme.button_medium.x, theme.button_medium.y);
                    skeleton_bar(ui, theme, theme.button_medium.x, theme.button_medium.y);
                });
                return;
            }

            ui.label(RichText::new("Total Balance").color(theme.text_secondary));
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format_btc(view.effective_balance()))
                        .size(44.0)
                        .strong()
                        .color(theme.text_primary),
                );
                ui.label(RichText::new("BTC").size(28.0).color(theme.text_secondary));
            });

            // Keep the line height stable while the rate is still unknown
            match view.effective_usd_value() {
                Some(usd) => {
                    ui.label(
                        RichText::new(format!("≈ ${} USD", format_usd(usd)))
                            .size(18.0)
                            .color(theme.text_secondary),
                    );
                }
                None => {
                    ui.add_space(24.0);
                }
            }

            ui.add_space(theme.spacing_md);
            ui.horizontal(|ui| {
                if ui.add(theme.button_primary("↑ Send")).clicked() {
                    actions.push(UiAction::OpenSend);
                }
                if ui.add(theme.button_secondary("↓ Receive")).clicked() {
                    actions.push(UiAction::OpenReceive);
                }
            });
        });
    });
}

fn render_insights(ui: &mut egui::Ui, theme: &AppTheme, view: &ViewState, actions: &mut Vec<UiAction>) {
    theme.frame_card().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new("✨ Spending Insights").size(18.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = match view.insights {
                    InsightsState::Ready(_) => "Re-analyze",
                    _ => "Analyze Spending",
                };
                let ready = view.transactions().is_some();
                let idle = view.insights != InsightsState::Pending;
                if ui
                    .add_enabled(ready && idle, theme.button_secondary(label))
                    .clicked()
                {
                    actions.push(UiAction::AnalyzeInsights);
                }
            });
        });
        ui.add_space(theme.spacing_sm);

        match &view.insights {
            InsightsState::Idle => {
                ui.label(
                    RichText::new("Get a quick summary of where your bitcoin went.")
                        .color(theme.text_secondary),
                );
            }
            InsightsState::Pending => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Analyzing your transactions…").color(theme.text_secondary));
                });
            }
            InsightsState::Ready(summary) => render_markdown(ui, theme, summary),
        }
    });
}
