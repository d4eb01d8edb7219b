//! Dashboard coordinator.
//!
//! On mount the coordinator launches three independent loads (ledger, price,
//! receive QR) as tasks on the tokio runtime. Each task reports back through
//! one channel; the GUI drains it every frame with [`DashboardCoordinator::poll`]
//! and renders from the derived [`ViewState`]. Loads settle in whatever order
//! the network returns them. The only pairing guarantee is that profile and
//! transactions arrive together in a single [`LedgerSnapshot`].

use crate::config::Config;
use crate::error::LedgerError;
use crate::http::build_client;
use crate::insights::{GeminiSummarizer, Summarizer, UNAVAILABLE_MESSAGE};
use crate::ledger::LedgerProvider;
use crate::price::{rate_or_fallback, CoinGeckoOracle, PriceOracle, RateState};
use crate::receive::{load_receive_image, QrServerProvider, ReceiveImage, ReceiveImageProvider};
use crate::types::{Profile, Transaction, UserIdentity};
use crate::utils::effective_usd_value;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// Page error shown when the ledger task ends without reporting.
pub const LEDGER_LOST_MESSAGE: &str = "Failed to fetch dashboard data.";

/// The collaborators a dashboard loads from.
#[derive(Clone)]
pub struct DashboardServices {
    pub ledger: Arc<dyn LedgerProvider>,
    pub price: Arc<dyn PriceOracle>,
    pub receive_image: Arc<dyn ReceiveImageProvider>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl DashboardServices {
    /// HTTP-backed price, QR and summarizer collaborators around `ledger`.
    pub fn from_config(config: &Config, ledger: Arc<dyn LedgerProvider>) -> Result<Self> {
        let client = build_client(config.http_timeout)?;
        Ok(Self {
            ledger,
            price: Arc::new(CoinGeckoOracle::new(client.clone(), config.price_url.clone())),
            receive_image: Arc::new(QrServerProvider::new(client.clone(), config.qr_url.clone())),
            summarizer: Arc::new(GeminiSummarizer::new(client, config.summarizer.clone())),
        })
    }
}

/// Lifecycle of a one-shot load.
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Load::Idle
    }
}

impl<T> Load<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Load::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Profile and transactions, always populated together.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub profile: Profile,
    pub transactions: Vec<Transaction>,
}

/// Spending insights panel. The summarizer cannot fail, so there is no
/// failed state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InsightsState {
    #[default]
    Idle,
    Pending,
    Ready(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    pub send_open: bool,
    pub receive_open: bool,
}

/// Everything the views render from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub ledger: Load<LedgerSnapshot>,
    pub rate: RateState,
    pub receive_image: ReceiveImage,
    pub insights: InsightsState,
    pub modals: ModalState,
}

impl ViewState {
    pub fn profile(&self) -> Option<&Profile> {
        self.ledger.ready().map(|snapshot| &snapshot.profile)
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.ledger
            .ready()
            .map(|snapshot| snapshot.transactions.as_slice())
    }

    /// Profile or transactions still missing. Price, QR and insights never
    /// hold this up.
    pub fn is_loading(&self) -> bool {
        self.profile().is_none() || self.transactions().is_none()
    }

    /// Page-replacing error from the ledger load.
    pub fn error(&self) -> Option<&str> {
        self.ledger.error()
    }

    /// Loaded balance, or zero while loading.
    pub fn effective_balance(&self) -> f64 {
        self.profile().map(|p| p.balance).unwrap_or(0.0)
    }

    pub fn effective_rate(&self) -> Option<f64> {
        self.rate.effective()
    }

    /// USD value of the loaded balance; `None` until both are known.
    pub fn effective_usd_value(&self) -> Option<f64> {
        self.profile()
            .and_then(|p| effective_usd_value(p.balance, self.effective_rate()))
    }
}

/// Settled result of one background load.
#[derive(Debug)]
enum DashboardEvent {
    Ledger {
        identity: UserIdentity,
        result: std::result::Result<LedgerSnapshot, LedgerError>,
    },
    Rate(RateState),
    ReceiveImage(ReceiveImage),
    Insights {
        identity: UserIdentity,
        summary: String,
    },
    /// The task for this load ended without sending its result.
    Lost(LoadKind),
}

/// Which load a background task is running.
#[derive(Debug, Clone)]
enum LoadKind {
    Ledger(UserIdentity),
    Rate,
    ReceiveImage,
    Insights(UserIdentity),
}

impl LoadKind {
    fn label(&self) -> &'static str {
        match self {
            LoadKind::Ledger(_) => "ledger",
            LoadKind::Rate => "price",
            LoadKind::ReceiveImage => "receive image",
            LoadKind::Insights(_) => "insights",
        }
    }
}

/// Sends [`DashboardEvent::Lost`] if dropped while armed, e.g. when the
/// load panics and its task unwinds.
struct LostLoadGuard {
    kind: Option<LoadKind>,
    tx: UnboundedSender<DashboardEvent>,
}

impl LostLoadGuard {
    fn disarm(mut self) {
        self.kind = None;
    }
}

impl Drop for LostLoadGuard {
    fn drop(&mut self) {
        if let Some(kind) = self.kind.take() {
            let _ = self.tx.send(DashboardEvent::Lost(kind));
        }
    }
}

/// Owns the dashboard view state for one mount.
pub struct DashboardCoordinator {
    services: DashboardServices,
    wallet_address: String,
    fallback_rate: f64,
    runtime: Handle,
    events_tx: UnboundedSender<DashboardEvent>,
    events_rx: UnboundedReceiver<DashboardEvent>,
    token: CancellationToken,
    mounted: bool,
    identity: Option<UserIdentity>,
    rate_requested: bool,
    image_requested: bool,
    view: ViewState,
}

impl DashboardCoordinator {
    pub fn new(
        services: DashboardServices,
        wallet_address: impl Into<String>,
        fallback_rate: f64,
        runtime: Handle,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            services,
            wallet_address: wallet_address.into(),
            fallback_rate,
            runtime,
            events_tx,
            events_rx,
            token: CancellationToken::new(),
            mounted: true,
            identity: None,
            rate_requested: false,
            image_requested: false,
            view: ViewState::default(),
        }
    }

    pub fn from_config(config: &Config, services: DashboardServices, runtime: Handle) -> Self {
        Self::new(
            services,
            config.wallet_address.clone(),
            config.fallback_rate,
            runtime,
        )
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start the loads for `identity`.
    ///
    /// Safe to call on every frame: the ledger load is only (re)issued when
    /// the identity changes, and the price and QR loads only once per mount.
    /// Without an identity nothing is fetched.
    pub fn initialize(&mut self, identity: Option<&UserIdentity>) {
        if !self.mounted {
            tracing::warn!("initialize called on an unmounted dashboard");
            return;
        }
        let Some(identity) = identity else {
            tracing::debug!("No authenticated identity, dashboard fetches suppressed");
            return;
        };

        if self.identity.as_ref() != Some(identity) {
            tracing::info!("Loading dashboard for {}", identity);
            self.identity = Some(identity.clone());
            self.view.ledger = Load::Pending;
            self.view.insights = InsightsState::Idle;
            self.spawn_ledger_load(identity.clone());
        }

        if !self.rate_requested {
            self.rate_requested = true;
            let oracle = Arc::clone(&self.services.price);
            let fallback = self.fallback_rate;
            self.spawn(LoadKind::Rate, async move {
                DashboardEvent::Rate(rate_or_fallback(oracle.as_ref(), fallback).await)
            });
        }

        if !self.image_requested {
            self.image_requested = true;
            let provider = Arc::clone(&self.services.receive_image);
            let address = self.wallet_address.clone();
            self.spawn(LoadKind::ReceiveImage, async move {
                DashboardEvent::ReceiveImage(load_receive_image(provider.as_ref(), &address).await)
            });
        }
    }

    fn spawn_ledger_load(&self, identity: UserIdentity) {
        let ledger = Arc::clone(&self.services.ledger);
        self.spawn(LoadKind::Ledger(identity.clone()), async move {
            // Both calls run to completion so a missing profile is always
            // reported ahead of missing transactions.
            let (profile, transactions) = tokio::join!(
                ledger.fetch_profile(&identity),
                ledger.fetch_transactions(&identity)
            );
            let result = match (profile, transactions) {
                (Ok(profile), Ok(transactions)) => Ok(LedgerSnapshot {
                    profile,
                    transactions,
                }),
                (Err(e), _) | (Ok(_), Err(e)) => Err(e),
            };
            DashboardEvent::Ledger { identity, result }
        });
    }

    fn spawn<F>(&self, kind: LoadKind, load: F)
    where
        F: Future<Output = DashboardEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        let token = self.token.clone();
        self.runtime.spawn(async move {
            let label = kind.label();
            let guard = LostLoadGuard {
                kind: Some(kind),
                tx: tx.clone(),
            };
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Dropped in-flight {} load", label);
                }
                event = load => {
                    let _ = tx.send(event);
                }
            }
            guard.disarm();
        });
    }

    /// Ask the summarizer about the loaded transactions. Returns whether a
    /// request was started.
    pub fn request_insights(&mut self) -> bool {
        if !self.mounted || self.view.insights == InsightsState::Pending {
            return false;
        }
        let (Some(identity), Some(snapshot)) = (self.identity.clone(), self.view.ledger.ready())
        else {
            return false;
        };
        let transactions = snapshot.transactions.clone();
        let summarizer = Arc::clone(&self.services.summarizer);
        self.view.insights = InsightsState::Pending;
        self.spawn(LoadKind::Insights(identity.clone()), async move {
            let summary = summarizer.summarize(&transactions).await;
            DashboardEvent::Insights { identity, summary }
        });
        true
    }

    /// Apply every result that has settled since the last call. Returns
    /// whether the view changed.
    pub fn poll(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Wait until no load is pending.
    pub async fn settle(&mut self) {
        while self.mounted && self.has_pending() {
            match self.events_rx.recv().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
        tracing::debug!("Dashboard settled");
    }

    pub fn has_pending(&self) -> bool {
        self.view.ledger.is_pending()
            || (self.rate_requested && !self.view.rate.is_known())
            || (self.image_requested && self.view.receive_image == ReceiveImage::NotYetAvailable)
            || self.view.insights == InsightsState::Pending
    }

    fn apply(&mut self, event: DashboardEvent) -> bool {
        match event {
            DashboardEvent::Ledger { identity, result } => {
                if self.identity.as_ref() != Some(&identity) || !self.view.ledger.is_pending() {
                    tracing::debug!("Discarding stale ledger result for {}", identity);
                    return false;
                }
                self.view.ledger = match result {
                    Ok(snapshot) => {
                        tracing::info!(
                            "Dashboard data loaded for {} ({} transactions)",
                            identity,
                            snapshot.transactions.len()
                        );
                        Load::Ready(snapshot)
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch dashboard data for {}: {}", identity, e);
                        Load::Failed(e.to_string())
                    }
                };
                true
            }
            DashboardEvent::Rate(state) => {
                if self.view.rate.is_known() {
                    return false;
                }
                self.view.rate = state;
                true
            }
            DashboardEvent::ReceiveImage(state) => {
                if self.view.receive_image != ReceiveImage::NotYetAvailable {
                    return false;
                }
                self.view.receive_image = state;
                true
            }
            DashboardEvent::Insights { identity, summary } => {
                if self.identity.as_ref() != Some(&identity)
                    || self.view.insights != InsightsState::Pending
                {
                    return false;
                }
                self.view.insights = InsightsState::Ready(summary);
                true
            }
            DashboardEvent::Lost(kind) => self.apply_lost(kind),
        }
    }

    /// Settle a load whose task died, with the same outcome its own failure
    /// path would have produced.
    fn apply_lost(&mut self, kind: LoadKind) -> bool {
        tracing::error!("Background {} load ended without a result", kind.label());
        match kind {
            LoadKind::Ledger(identity) => {
                if self.identity.as_ref() != Some(&identity) || !self.view.ledger.is_pending() {
                    return false;
                }
                self.view.ledger = Load::Failed(LEDGER_LOST_MESSAGE.to_string());
            }
            LoadKind::Rate => {
                if self.view.rate.is_known() {
                    return false;
                }
                self.view.rate = RateState::Fallback(self.fallback_rate);
            }
            LoadKind::ReceiveImage => {
                if self.view.receive_image != ReceiveImage::NotYetAvailable {
                    return false;
                }
                self.view.receive_image = ReceiveImage::Failed;
            }
            LoadKind::Insights(identity) => {
                if self.identity.as_ref() != Some(&identity)
                    || self.view.insights != InsightsState::Pending
                {
                    return false;
                }
                self.view.insights = InsightsState::Ready(UNAVAILABLE_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn open_send_modal(&mut self) {
        self.view.modals.send_open = true;
    }

    pub fn close_send_modal(&mut self) {
        self.view.modals.send_open = false;
    }

    pub fn open_receive_modal(&mut self) {
        self.view.modals.receive_open = true;
    }

    pub fn close_receive_modal(&mut self) {
        self.view.modals.receive_open = false;
    }

    /// Stop applying results and drop in-flight loads.
    pub fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.token.cancel();
            tracing::info!("Dashboard unmounted");
        }
    }
}

impl Drop for DashboardCoordinator {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImageError, PriceError};
    use crate::insights::DISABLED_MESSAGE;
    use crate::ledger::{LedgerLatency, MockLedger};
    use crate::receive::PNG_1X1;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    const ADDRESS: &str = "37T14ky2anWmM3GyaLEMER8fxyLhcGUKAY";

    // ==================== fakes ====================

    /// Demo ledger with call counters and optional per-identity delays.
    #[derive(Default)]
    struct CountingLedger {
        inner: MockLedger,
        delays: HashMap<UserIdentity, (Duration, Duration)>,
        profile_calls: AtomicUsize,
        transaction_calls: AtomicUsize,
    }

    impl CountingLedger {
        fn demo() -> Self {
            Self {
                inner: MockLedger::demo().unwrap().with_latency(LedgerLatency::none()),
                ..Default::default()
            }
        }

        fn with_delay(mut self, identity: &UserIdentity, profile: Duration, transactions: Duration) -> Self {
            self.delays.insert(identity.clone(), (profile, transactions));
            self
        }
    }

    #[async_trait]
    impl LedgerProvider for CountingLedger {
        async fn fetch_profile(&self, identity: &UserIdentity) -> std::result::Result<Profile, LedgerError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if let Some((delay, _)) = self.delays.get(identity) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.fetch_profile(identity).await
        }

        async fn fetch_transactions(
            &self,
            identity: &UserIdentity,
        ) -> std::result::Result<Vec<Transaction>, LedgerError> {
            self.transaction_calls.fetch_add(1, Ordering::SeqCst);
            if let Some((_, delay)) = self.delays.get(identity) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.fetch_transactions(identity).await
        }
    }

    #[derive(Default)]
    struct FakeOracle {
        rate: Option<f64>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceOracle for FakeOracle {
        async fn fetch_rate(&self) -> std::result::Result<f64, PriceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.rate
                .ok_or_else(|| PriceError::RequestFailed("network rejected".into()))
        }
    }

    #[derive(Default)]
    struct FakeImages {
        payload: Option<Vec<u8>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReceiveImageProvider for FakeImages {
        async fn fetch_image(&self, _address: &str) -> std::result::Result<Vec<u8>, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.payload
                .clone()
                .ok_or_else(|| ImageError::RequestFailed("connection reset".into()))
        }
    }

    /// Ledger whose backend crashes mid-request.
    struct PanickingLedger;

    #[async_trait]
    impl LedgerProvider for PanickingLedger {
        async fn fetch_profile(&self, _identity: &UserIdentity) -> std::result::Result<Profile, LedgerError> {
            panic!("ledger backend crashed")
        }

        async fn fetch_transactions(
            &self,
            _identity: &UserIdentity,
        ) -> std::result::Result<Vec<Transaction>, LedgerError> {
            panic!("ledger backend crashed")
        }
    }

    struct PanickingImages;

    #[async_trait]
    impl ReceiveImageProvider for PanickingImages {
        async fn fetch_image(&self, _address: &str) -> std::result::Result<Vec<u8>, ImageError> {
            panic!("qr service crashed")
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, transactions: &[Transaction]) -> String {
            format!("### Summary\n- {} transactions", transactions.len())
        }
    }

    struct DisabledSummarizer;

    #[async_trait]
    impl Summarizer for DisabledSummarizer {
        async fn summarize(&self, _transactions: &[Transaction]) -> String {
            DISABLED_MESSAGE.to_string()
        }
    }

    struct Harness {
        ledger: Arc<CountingLedger>,
        oracle: Arc<FakeOracle>,
        images: Arc<FakeImages>,
    }

    impl Harness {
        fn new(ledger: CountingLedger, oracle: FakeOracle, images: FakeImages) -> Self {
            Self {
                ledger: Arc::new(ledger),
                oracle: Arc::new(oracle),
                images: Arc::new(images),
            }
        }

        fn healthy() -> Self {
            Self::new(
                CountingLedger::demo(),
                FakeOracle {
                    rate: Some(65000.0),
                    ..Default::default()
                },
                FakeImages {
                    payload: Some(PNG_1X1.to_vec()),
                    ..Default::default()
                },
            )
        }

        fn coordinator(&self) -> DashboardCoordinator {
            self.coordinator_with(Arc::new(EchoSummarizer))
        }

        fn coordinator_with(&self, summarizer: Arc<dyn Summarizer>) -> DashboardCoordinator {
            let services = DashboardServices {
                ledger: self.ledger.clone(),
                price: self.oracle.clone(),
                receive_image: self.images.clone(),
                summarizer,
            };
            DashboardCoordinator::new(services, ADDRESS, 65000.0, Handle::current())
        }
    }

    fn franklin() -> UserIdentity {
        UserIdentity::parse("fortunatefranklin@gmail.com").unwrap()
    }

    fn stranger() -> UserIdentity {
        UserIdentity::parse("nobody@example.com").unwrap()
    }

    async fn settle(dashboard: &mut DashboardCoordinator) {
        tokio::time::timeout(Duration::from_secs(5), dashboard.settle())
            .await
            .expect("dashboard did not settle");
    }

    // ==================== initial state tests ====================

    #[tokio::test]
    async fn test_initial_view_is_loading_and_unknown() {
        let harness = Harness::healthy();
        let dashboard = harness.coordinator();
        let view = dashboard.view();
        assert!(view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.rate, RateState::Unknown);
        assert_eq!(view.receive_image, ReceiveImage::NotYetAvailable);
        assert_eq!(view.effective_usd_value(), None);
        assert_eq!(view.effective_balance(), 0.0);
        assert_eq!(view.modals, ModalState::default());
    }

    #[tokio::test]
    async fn test_absent_identity_suppresses_all_fetches() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        dashboard.initialize(None);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!dashboard.poll());
        assert!(!dashboard.has_pending());
        assert_eq!(harness.ledger.profile_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.images.calls.load(Ordering::SeqCst), 0);
        assert!(dashboard.view().is_loading());
    }

    // ==================== ledger load tests ====================

    #[tokio::test]
    async fn test_successful_load_populates_view() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;

        let view = dashboard.view();
        assert!(!view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.profile().unwrap().display_name, "Frank Omajemite");
        assert_eq!(view.transactions().unwrap().len(), 12);
        assert_eq!(view.rate, RateState::Live(65000.0));
        assert!(matches!(view.receive_image, ReceiveImage::Available(_)));

        let usd = view.effective_usd_value().unwrap();
        assert!((usd - 11704.98745).abs() < 1e-6);
        assert_eq!(crate::utils::format_usd(usd), "11,704.99");
    }

    #[tokio::test]
    async fn test_profile_and_transactions_arrive_together() {
        let harness = Harness::new(
            CountingLedger::demo().with_delay(
                &franklin(),
                Duration::from_millis(5),
                Duration::from_millis(60),
            ),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while dashboard.view().is_loading() {
            dashboard.poll();
            let view = dashboard.view();
            assert_eq!(view.profile().is_some(), view.transactions().is_some());
            assert!(tokio::time::Instant::now() < deadline, "ledger never loaded");
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert!(dashboard.view().profile().is_some());
        assert!(dashboard.view().transactions().is_some());
    }

    #[tokio::test]
    async fn test_unknown_identity_sets_error_without_partial_data() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&stranger()));
        settle(&mut dashboard).await;

        let view = dashboard.view();
        assert_eq!(view.error(), Some("User profile not found."));
        assert!(view.profile().is_none());
        assert!(view.transactions().is_none());
        assert!(view.is_loading());
        // Non-fatal loads still settle independently.
        assert_eq!(view.rate, RateState::Live(65000.0));
    }

    #[tokio::test]
    async fn test_profile_error_wins_when_transactions_fail_first() {
        let harness = Harness::new(
            CountingLedger::demo().with_delay(
                &stranger(),
                Duration::from_millis(40),
                Duration::ZERO,
            ),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&stranger()));
        settle(&mut dashboard).await;

        assert_eq!(dashboard.view().error(), Some("User profile not found."));
        assert_eq!(harness.ledger.transaction_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_identity_result_is_discarded() {
        let slow = UserIdentity::parse("slow@example.com").unwrap();
        let harness = Harness::new(
            CountingLedger::demo().with_delay(
                &slow,
                Duration::from_millis(150),
                Duration::from_millis(150),
            ),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&slow));
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        assert_eq!(dashboard.view().profile().unwrap().identity, franklin());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!dashboard.poll());
        assert_eq!(dashboard.view().profile().unwrap().identity, franklin());
        assert!(dashboard.view().error().is_none());
    }

    // ==================== idempotency tests ====================

    #[tokio::test]
    async fn test_initialize_is_idempotent_per_identity() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;

        assert_eq!(harness.ledger.profile_calls.load(Ordering::SeqCst), 1);
        assert_eq!(harness.ledger.transaction_calls.load(Ordering::SeqCst), 1);
        assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 1);
        assert_eq!(harness.images.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_identity_change_refetches_ledger_only() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        dashboard.initialize(Some(&stranger()));
        settle(&mut dashboard).await;

        assert_eq!(harness.ledger.profile_calls.load(Ordering::SeqCst), 2);
        assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 1);
        assert_eq!(harness.images.calls.load(Ordering::SeqCst), 1);
        assert!(dashboard.view().error().is_some());
    }

    // ==================== rate tests ====================

    #[tokio::test]
    async fn test_rate_failure_uses_fallback_without_error() {
        let harness = Harness::new(
            CountingLedger::demo(),
            FakeOracle::default(),
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;

        let view = dashboard.view();
        assert_eq!(view.rate, RateState::Fallback(65000.0));
        assert_eq!(view.effective_rate(), Some(65000.0));
        assert!(view.error().is_none());
        let usd = view.effective_usd_value().unwrap();
        assert!((usd - 0.18007673 * 65000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_pending_rate_does_not_block_loading_flag() {
        let gate = Arc::new(Notify::new());
        let harness = Harness::new(
            CountingLedger::demo(),
            FakeOracle {
                rate: Some(70000.0),
                gate: Some(gate.clone()),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while dashboard.view().is_loading() {
            dashboard.poll();
            assert!(tokio::time::Instant::now() < deadline);
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(dashboard.view().effective_usd_value(), None);

        gate.notify_one();
        settle(&mut dashboard).await;
        assert_eq!(dashboard.view().effective_rate(), Some(70000.0));
    }

    // ==================== receive image tests ====================

    #[tokio::test]
    async fn test_image_failure_is_explicit_and_distinct_from_pending() {
        let gate = Arc::new(Notify::new());
        let harness = Harness::new(
            CountingLedger::demo(),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: None,
                gate: Some(gate.clone()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        dashboard.poll();
        assert_eq!(dashboard.view().receive_image, ReceiveImage::NotYetAvailable);

        gate.notify_one();
        settle(&mut dashboard).await;
        assert_eq!(dashboard.view().receive_image, ReceiveImage::Failed);
        assert!(dashboard.view().error().is_none());
    }

    #[tokio::test]
    async fn test_unconvertible_image_payload_fails() {
        let harness = Harness::new(
            CountingLedger::demo(),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(b"<html>".to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        assert!(dashboard.view().receive_image.is_failed());
    }

    #[tokio::test]
    async fn test_undecodable_image_payload_fails() {
        let harness = Harness::new(
            CountingLedger::demo(),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1[..12].to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        assert_eq!(dashboard.view().receive_image, ReceiveImage::Failed);
        assert!(dashboard.view().error().is_none());
    }

    // ==================== lost task tests ====================

    #[tokio::test]
    async fn test_panicking_ledger_settles_with_error() {
        let harness = Harness::healthy();
        let services = DashboardServices {
            ledger: Arc::new(PanickingLedger),
            price: harness.oracle.clone(),
            receive_image: harness.images.clone(),
            summarizer: Arc::new(EchoSummarizer),
        };
        let mut dashboard = DashboardCoordinator::new(services, ADDRESS, 65000.0, Handle::current());
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;

        let view = dashboard.view();
        assert_eq!(view.error(), Some(LEDGER_LOST_MESSAGE));
        assert!(view.profile().is_none());
        assert!(view.transactions().is_none());
        assert_eq!(view.rate, RateState::Live(65000.0));
    }

    #[tokio::test]
    async fn test_panicking_image_provider_settles_as_failed() {
        let harness = Harness::healthy();
        let services = DashboardServices {
            ledger: harness.ledger.clone(),
            price: harness.oracle.clone(),
            receive_image: Arc::new(PanickingImages),
            summarizer: Arc::new(EchoSummarizer),
        };
        let mut dashboard = DashboardCoordinator::new(services, ADDRESS, 65000.0, Handle::current());
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;

        assert_eq!(dashboard.view().receive_image, ReceiveImage::Failed);
        assert!(dashboard.view().error().is_none());
        assert!(!dashboard.view().is_loading());
    }

    // ==================== modal tests ====================

    #[tokio::test]
    async fn test_modals_toggle_independently() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();

        dashboard.open_send_modal();
        dashboard.open_receive_modal();
        assert_eq!(
            dashboard.view().modals,
            ModalState {
                send_open: true,
                receive_open: true
            }
        );

        dashboard.close_send_modal();
        assert!(!dashboard.view().modals.send_open);
        assert!(dashboard.view().modals.receive_open);

        dashboard.close_receive_modal();
        assert_eq!(dashboard.view().modals, ModalState::default());
    }

    // ==================== insights tests ====================

    #[tokio::test]
    async fn test_insights_require_loaded_transactions() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator();
        assert!(!dashboard.request_insights());

        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        assert!(dashboard.request_insights());
        assert!(!dashboard.request_insights());
        assert_eq!(dashboard.view().insights, InsightsState::Pending);

        settle(&mut dashboard).await;
        assert_eq!(
            dashboard.view().insights,
            InsightsState::Ready("### Summary\n- 12 transactions".to_string())
        );
    }

    #[tokio::test]
    async fn test_disabled_insights_surface_message() {
        let harness = Harness::healthy();
        let mut dashboard = harness.coordinator_with(Arc::new(DisabledSummarizer));
        dashboard.initialize(Some(&franklin()));
        settle(&mut dashboard).await;
        dashboard.request_insights();
        settle(&mut dashboard).await;
        assert_eq!(
            dashboard.view().insights,
            InsightsState::Ready(DISABLED_MESSAGE.to_string())
        );
    }

    // ==================== unmount tests ====================

    #[tokio::test]
    async fn test_unmount_discards_late_results() {
        let harness = Harness::new(
            CountingLedger::demo().with_delay(
                &franklin(),
                Duration::from_millis(30),
                Duration::from_millis(30),
            ),
            FakeOracle {
                rate: Some(65000.0),
                ..Default::default()
            },
            FakeImages {
                payload: Some(PNG_1X1.to_vec()),
                ..Default::default()
            },
        );
        let mut dashboard = harness.coordinator();
        dashboard.initialize(Some(&franklin()));
        dashboard.unmount();
        assert!(!dashboard.is_mounted());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!dashboard.poll());
        assert!(dashboard.view().is_loading());
        assert_eq!(dashboard.view().rate, RateState::Unknown);

        // Unmounted dashboards ignore further requests.
        dashboard.initialize(Some(&stranger()));
        assert_eq!(dashboard.identity(), Some(&franklin()));
        settle(&mut dashboard).await;
    }
}
