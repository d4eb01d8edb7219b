//! Send form model.
//!
//! The dashboard is read-only: a draft can be validated and reviewed, but
//! nothing is signed or broadcast.

use crate::error::SendFormError;
use crate::utils::parse_btc;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_ALPHABET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Raw user input of the send modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendDraft {
    pub recipient: String,
    pub amount: String,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub recipient: String,
    pub amount: f64,
    /// Balance left after the send.
    pub remaining: f64,
}

impl SendDraft {
    pub fn validate(&self, balance: f64) -> Result<SendRequest, SendFormError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(SendFormError::MissingRecipient);
        }
        if !looks_like_bitcoin_address(recipient) {
            return Err(SendFormError::InvalidRecipient(recipient.to_string()));
        }

        if self.amount.trim().is_empty() {
            return Err(SendFormError::MissingAmount);
        }
        let amount =
            parse_btc(&self.amount).ok_or_else(|| SendFormError::InvalidAmount(self.amount.trim().to_string()))?;
        if amount <= 0.0 {
            return Err(SendFormError::NonPositiveAmount);
        }
        if amount > balance {
            return Err(SendFormError::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }

        Ok(SendRequest {
            recipient: recipient.to_string(),
            amount,
            remaining: balance - amount,
        })
    }

    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }
}

/// Shape check only: legacy/P2SH base58 or segwit bech32. No checksum.
pub fn looks_like_bitcoin_address(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    if lower.starts_with("bc1") || lower.starts_with("tb1") {
        // Mixed case is invalid in bech32.
        if address != lower && address != address.to_ascii_uppercase() {
            return false;
        }
        let data = &lower[3..];
        return (14..=74).contains(&address.len())
            && !data.is_empty()
            && data.chars().all(|c| BECH32_ALPHABET.contains(c));
    }
    (address.starts_with('1') || address.starts_with('3'))
        && (26..=35).contains(&address.len())
        && address.chars().all(|c| BASE58_ALPHABET.contains(c))
}
