#![windows_subsystem = "windows"]

use anyhow::{Context, Result};
use bitprivacy::{
    auth::AcceptAnyCode,
    config::Config,
    dashboard::DashboardServices,
    gui,
    ledger::MockLedger,
};
use std::sync::Arc;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!(
        "Starting BitPrivacy (insights {})",
        if config.summarizer.is_enabled() { "enabled" } else { "disabled" }
    );

    // Background loads run here; the GUI thread only polls their results
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("bitprivacy-worker")
        .build()
        .context("Failed to create async runtime")?;

    let ledger = MockLedger::demo().context("Failed to load the demo ledger")?;
    let services = DashboardServices::from_config(&config, Arc::new(ledger))?;
    let authenticator = Arc::new(AcceptAnyCode::default());

    gui::launch(config, services, authenticator, runtime.handle().clone())?;

    Ok(())
}
