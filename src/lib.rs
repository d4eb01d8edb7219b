//! BitPrivacy wallet dashboard.
//!
//! A read-only Bitcoin wallet view: after sign-in the dashboard loads the
//! account profile and transaction history from a [`ledger::LedgerProvider`],
//! the BTC/USD rate from a [`price::PriceOracle`] and a receive QR code from a
//! [`receive::ReceiveImageProvider`], all concurrently. The
//! [`dashboard::DashboardCoordinator`] owns that state; the [`gui`] renders it.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gui;
pub mod http;
pub mod insights;
pub mod ledger;
pub mod price;
pub mod receive;
pub mod send;
pub mod types;
pub mod utils;
