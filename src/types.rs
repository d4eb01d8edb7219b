//! Common types shared across modules.

use crate::error::IdentityError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email-like key selecting which ledger record to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Parse and normalise (trim, lowercase) an email-like identity.
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        let mut parts = trimmed.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty()
            || domain.is_empty()
            || parts.next().is_some()
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(IdentityError::Malformed(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserIdentity> for String {
    fn from(identity: UserIdentity) -> Self {
        identity.0
    }
}

/// Account profile as served by the ledger provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub uid: String,
    #[serde(rename = "email")]
    pub identity: UserIdentity,
    pub display_name: String,
    /// Balance in BTC, never negative.
    pub balance: f64,
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxCategory {
    Sent,
    Received,
    #[serde(untagged)]
    Other(String),
}

impl TxCategory {
    /// Whether `amount` has the sign this category requires.
    pub fn admits(&self, amount: f64) -> bool {
        match self {
            TxCategory::Sent => amount <= 0.0,
            TxCategory::Received => amount >= 0.0,
            TxCategory::Other(_) => true,
        }
    }
}

impl fmt::Display for TxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxCategory::Sent => f.write_str("Sent"),
            TxCategory::Received => f.write_str("Received"),
            TxCategory::Other(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Done,
    Pending,
    Failed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Done => f.write_str("Done"),
            TxStatus::Pending => f.write_str("Pending"),
            TxStatus::Failed => f.write_str("Failed"),
        }
    }
}

/// A single ledger entry. `amount` is signed: negative is an outflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    pub description: String,
    pub category: TxCategory,
    pub amount: f64,
    pub status: TxStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    /// Destination for outflows, source for inflows.
    #[serde(default, alias = "destination", alias = "source", skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    /// Amount sign agrees with the category direction.
    pub fn direction_consistent(&self) -> bool {
        self.category.admits(self.amount)
    }

    /// One line of the summarizer input.
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} ({}) - {:.8} BTC",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.category,
            self.amount
        )
    }
}

/// Transactions are stored with minute precision (`HH:MM`).
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
