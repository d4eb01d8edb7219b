//! GUI module for the BitPrivacy wallet
//!
//! This module provides the graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main WalletApp struct, per-frame polling and the `launch` entry point
//! - `async_job` - Pollable one-shot background jobs
//! - `theme` - Centralized theme and styling system (AppTheme)
//! - `helpers` - Icon and QR textures, markdown rendering, skeleton placeholders
//! - `notifications` - Toast notifications
//! - `views` - Login, dashboard and the send/receive modals
//! - `widgets` - Reusable UI widgets (TransactionList)
//!
//! All data comes from a [`crate::dashboard::DashboardCoordinator`]; views
//! only read its [`crate::dashboard::ViewState`] and report user actions.

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::{launch, WalletApp};

pub use async_job::AsyncJob;
pub use notifications::NotificationEntry;
pub use theme::{configure_style, AppTheme};
pub use widgets::TransactionList;
