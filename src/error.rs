//! Error types for the dashboard collaborators.
//!
//! Every collaborator gets its own enum so the coordinator can decide, per
//! source, whether a failure is fatal (ledger), silently degraded (price),
//! rendered as an explicit state (receive image) or contained (summarizer).

use crate::http::NotSuccessResponseInfo;
use thiserror::Error;

/// Failures from a [`crate::ledger::LedgerProvider`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("User profile not found.")]
    ProfileNotFound,
    #[error("Transactions not found.")]
    TransactionsNotFound,
    #[error("Invalid ledger data: {0}")]
    InvalidData(String),
}

/// Failures from a [`crate::price::PriceOracle`]. Never shown to the user.
#[derive(Debug, Clone, Error)]
pub enum PriceError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Not success response: {0:?}")]
    NotSuccessResponse(NotSuccessResponseInfo),
    #[error("Cannot parse response: {0}")]
    CannotParseResponse(String),
    #[error("Cannot parse data: {0}")]
    CannotParseData(String),
    #[error("Rate must be positive, got {0}")]
    NonPositiveRate(f64),
}

/// Failures fetching or converting the receive QR image.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("Invalid QR request: {0}")]
    InvalidRequest(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Not success response: {0:?}")]
    NotSuccessResponse(NotSuccessResponseInfo),
    #[error("Empty image payload")]
    EmptyPayload,
    #[error("Unrecognised image format")]
    UnknownFormat,
    #[error("Cannot decode image: {0}")]
    Undecodable(String),
}

/// Internal summarizer failures. These never leave [`crate::insights`]; they
/// are mapped to user-facing markdown there.
#[derive(Debug, Clone, Error)]
pub enum SummarizerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Not success response: {0:?}")]
    NotSuccessResponse(NotSuccessResponseInfo),
    #[error("Cannot parse response: {0}")]
    CannotParseResponse(String),
    #[error("Response contained no text")]
    EmptyResponse,
}

impl SummarizerError {
    /// Whether the backend rejected the configured API key.
    pub fn is_invalid_key(&self) -> bool {
        match self {
            Self::NotSuccessResponse(info) => info.text.contains("API key not valid"),
            Self::RequestFailed(msg) => msg.contains("API key not valid"),
            _ => false,
        }
    }
}

/// Failures from an [`crate::auth::Authenticator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Verification code must not be empty")]
    EmptyCode,
}

/// Rejections when parsing a [`crate::types::UserIdentity`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Email address cannot be empty")]
    Empty,
    #[error("'{0}' is not a valid email address")]
    Malformed(String),
}

/// Rejections from [`crate::send::SendDraft::validate`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SendFormError {
    #[error("Recipient address is required")]
    MissingRecipient,
    #[error("'{0}' does not look like a Bitcoin address")]
    InvalidRecipient(String),
    #[error("Amount is required")]
    MissingAmount,
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Amount {requested:.8} BTC exceeds available balance {available:.8} BTC")]
    InsufficientBalance { requested: f64, available: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_messages_are_user_readable() {
        assert_eq!(LedgerError::ProfileNotFound.to_string(), "User profile not found.");
        assert_eq!(LedgerError::TransactionsNotFound.to_string(), "Transactions not found.");
    }

    #[test]
    fn test_summarizer_error_detects_invalid_key() {
        let err = SummarizerError::NotSuccessResponse(NotSuccessResponseInfo {
            status_code: 400,
            text: "{\"error\":{\"message\":\"API key not valid. Please pass a valid API key.\"}}".into(),
        });
        assert!(err.is_invalid_key());

        let err = SummarizerError::NotSuccessResponse(NotSuccessResponseInfo {
            status_code: 503,
            text: "overloaded".into(),
        });
        assert!(!err.is_invalid_key());
        assert!(!SummarizerError::EmptyResponse.is_invalid_key());
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = SendFormError::InsufficientBalance {
            requested: 1.0,
            available: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "Amount 1.00000000 BTC exceeds available balance 0.50000000 BTC"
        );
    }
}
