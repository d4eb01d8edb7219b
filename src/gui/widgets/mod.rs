//! Widget components for the GUI
//!
//! This module contains reusable UI widgets that can be embedded in views.
//!
//! ## Available Widgets
//!
//! - `TransactionList` - Ledger entries with status, amounts and explorer links

mod transaction_list;

pub use transaction_list::{TransactionList, TransactionListAction};
