//! Main GUI application module
//!
//! Contains the WalletApp struct, its screen state, and the eframe entry point.

use crate::{
    auth::{Authenticator, Session},
    config::Config,
    dashboard::{DashboardCoordinator, DashboardServices},
    send::{SendDraft, SendRequest},
    types::UserIdentity,
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::runtime::Handle;

use super::async_job::AsyncJob;
use super::helpers::{load_icon, load_qr_texture};
use super::notifications::{push_notification, NotificationEntry, NotificationLevel};
use super::theme::{configure_style, AppTheme};
use super::widgets::TransactionListAction;

#[derive(Default)]
pub(crate) struct LoginState {
    pub(crate) email: String,
    pub(crate) code: String,
    pub(crate) error: Option<String>,
    /// Resolves to the verified identity, or `None` when the code was rejected.
    pub(crate) job: Option<AsyncJob<Option<UserIdentity>>>,
}

#[derive(Default)]
pub(crate) struct SendFormState {
    pub(crate) draft: SendDraft,
    pub(crate) error: Option<String>,
    pub(crate) review: Option<SendRequest>,
}

impl SendFormState {
    pub(crate) fn reset(&mut self) {
        self.draft.clear();
        self.error = None;
        self.review = None;
    }
}

/// Things a view asked for during a frame, applied once rendering is done.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiAction {
    OpenSend,
    CloseSend,
    OpenReceive,
    CloseReceive,
    AnalyzeInsights,
    SignOut,
    CopyToClipboard { text: String, what: &'static str },
    OpenUrl(String),
}

impl From<TransactionListAction> for UiAction {
    fn from(action: TransactionListAction) -> Self {
        match action {
            TransactionListAction::OpenExplorer(url) => UiAction::OpenUrl(url),
            TransactionListAction::CopyHash(hash) => UiAction::CopyToClipboard {
                text: hash,
                what: "Transaction hash",
            },
        }
    }
}

pub struct WalletApp {
    pub(crate) config: Config,
    pub(crate) services: DashboardServices,
    pub(crate) authenticator: Arc<dyn Authenticator>,
    pub(crate) runtime: Handle,
    pub(crate) theme: AppTheme,
    pub(crate) session: Session,
    pub(crate) login: LoginState,
    pub(crate) dashboard: Option<DashboardCoordinator>,
    pub(crate) qr_texture: Option<egui::TextureHandle>,
    /// Decode is tried once per fetched image.
    pub(crate) qr_decode_attempted: bool,
    pub(crate) send_form: SendFormState,
    pub(crate) notifications: VecDeque<NotificationEntry>,
}

impl WalletApp {
    fn new(
        config: Config,
        services: DashboardServices,
        authenticator: Arc<dyn Authenticator>,
        runtime: Handle,
        ctx: &egui::Context,
    ) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        Self {
            config,
            services,
            authenticator,
            runtime,
            theme,
            session: Session::default(),
            login: LoginState::default(),
            dashboard: None,
            qr_texture: None,
            qr_decode_attempted: false,
            send_form: SendFormState::default(),
            notifications: VecDeque::with_capacity(20),
        }
    }

    fn poll_jobs(&mut self) {
        if let Some(job) = &mut self.login.job {
            if let Some(res) = job.poll() {
                self.login.job = None;
                match res {
                    Ok(Some(identity)) => self.complete_sign_in(identity),
                    Ok(None) => {
                        self.login.error = Some("Invalid verification code.".to_string());
                    }
                    Err(e) => {
                        tracing::error!("Sign-in failed: {}", e);
                        self.login.error = Some(e.to_string());
                    }
                }
            }
        }
    }

    fn complete_sign_in(&mut self, identity: UserIdentity) {
        tracing::info!("Signed in as {}", identity);
        self.session.accept(identity);
        self.login = LoginState::default();
        self.mount_dashboard();
    }

    fn mount_dashboard(&mut self) {
        if let Some(mut previous) = self.dashboard.take() {
            previous.unmount();
        }
        self.qr_texture = None;
        self.qr_decode_attempted = false;
        self.send_form.reset();
        self.dashboard = Some(DashboardCoordinator::from_config(
            &self.config,
            self.services.clone(),
            self.runtime.clone(),
        ));
    }

    fn sign_out(&mut self) {
        if let Some(mut dashboard) = self.dashboard.take() {
            dashboard.unmount();
        }
        self.qr_texture = None;
        self.qr_decode_attempted = false;
        self.send_form.reset();
        self.session.sign_out();
    }

    /// Drive the dashboard: (re)issue loads for the current identity and
    /// apply whatever has settled.
    fn poll_dashboard(&mut self, ctx: &egui::Context) {
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        dashboard.initialize(self.session.identity());
        if dashboard.poll() {
            ctx.request_repaint();
        }
        if !self.qr_decode_attempted {
            if let Some(image) = dashboard.view().receive_image.image() {
                self.qr_decode_attempted = true;
                self.qr_texture = load_qr_texture(ctx, image);
            }
        }
    }

    pub(crate) fn notify(&mut self, entry: NotificationEntry) {
        push_notification(&mut self.notifications, entry);
    }

    pub(crate) fn apply_actions(&mut self, ctx: &egui::Context, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::OpenSend => {
                    if let Some(dashboard) = &mut self.dashboard {
                        self.send_form.reset();
                        dashboard.open_send_modal();
                    }
                }
                UiAction::CloseSend => {
                    if let Some(dashboard) = &mut self.dashboard {
                        dashboard.close_send_modal();
                    }
                    self.send_form.reset();
                }
                UiAction::OpenReceive => {
                    if let Some(dashboard) = &mut self.dashboard {
                        dashboard.open_receive_modal();
                    }
                }
                UiAction::CloseReceive => {
                    if let Some(dashboard) = &mut self.dashboard {
                        dashboard.close_receive_modal();
                    }
                }
                UiAction::AnalyzeInsights => {
                    if let Some(dashboard) = &mut self.dashboard {
                        dashboard.request_insights();
                    }
                }
                UiAction::SignOut => self.sign_out(),
                UiAction::CopyToClipboard { text, what } => {
                    ctx.output_mut(|o| o.copied_text = text);
                    self.notify(NotificationEntry::new(format!("{} copied", what)));
                }
                UiAction::OpenUrl(url) => {
                    if let Err(e) = open::that(&url) {
                        self.notify(NotificationEntry::error(format!("Failed to open URL: {}", e)));
                    }
                }
            }
        }
    }

    fn render_header(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.add_space(self.theme.spacing_sm);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("₿ BitPrivacy")
                    .size(22.0)
                    .strong()
                    .color(self.theme.warning),
            );
            ui.label(
                RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
            if !self.session.is_authenticated() {
                return;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(self.theme.button_secondary("Sign out")).clicked() {
                    actions.push(UiAction::SignOut);
                }
                let who = self
                    .dashboard
                    .as_ref()
                    .and_then(|d| d.view().profile())
                    .map(|p| p.display_name.clone())
                    .or_else(|| self.session.identity().map(|i| i.to_string()));
                if let Some(who) = who {
                    ui.label(RichText::new(who).color(self.theme.text_secondary));
                }
            });
        });
        ui.add_space(self.theme.spacing_sm);
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let now = chrono::Local::now();
        let fresh: Vec<&NotificationEntry> = self
            .notifications
            .iter()
            .rev()
            .take_while(|n| n.is_fresh(now))
            .collect();
        if fresh.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                for entry in fresh {
                    let color = match entry.level {
                        NotificationLevel::Info => self.theme.text_primary,
                        NotificationLevel::Error => self.theme.error,
                    };
                    self.theme.frame_card().inner_margin(12.0).show(ui, |ui| {
                        ui.label(RichText::new(&entry.message).color(color));
                    });
                }
            });
    }
}

impl App for WalletApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();
        self.poll_dashboard(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.panel_fill)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing_md, 0.0))
                    .stroke(egui::Stroke::new(1.0, self.theme.border)),
            )
            .show(ctx, |ui| self.render_header(ui, &mut actions));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.session.is_authenticated() {
                    self.view_dashboard(ui, &mut actions);
                } else {
                    self.view_login(ui);
                }
            });
        });

        self.view_receive_modal(ctx, &mut actions);
        self.view_send_modal(ctx, &mut actions);
        self.render_toasts(ctx);

        self.apply_actions(ctx, actions);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

pub fn launch(
    config: Config,
    services: DashboardServices,
    authenticator: Arc<dyn Authenticator>,
    runtime: Handle,
) -> Result<()> {
    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(WalletApp::new(
            config.clone(),
            services.clone(),
            Arc::clone(&authenticator),
            runtime.clone(),
            &cc.egui_ctx,
        )) as Box<dyn App>
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 760.0])
        .with_min_inner_size([420.0, 560.0]);
    if let Some(icon) = load_icon() {
        viewport = viewport.with_icon(Arc::new(icon));
    }

    let native_options = NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native("BitPrivacy Wallet", native_options, Box::new(app_creator))
        .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
