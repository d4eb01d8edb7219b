//! View modules for the GUI
//!
//! Each submodule adds rendering methods to `WalletApp` for one screen or
//! modal. They are called from `App::update` in `app.rs`.
//!
//! - `login` - Email and two-factor code sign-in
//! - `dashboard` - Balance card, recent activity and spending insights
//! - `receive` - Receive address and QR code modal
//! - `send` - Send form with validation and review

pub mod dashboard;
pub mod login;
pub mod receive;
pub mod send;
