//! Ledger provider: profile and transaction history for a user identity.
//!
//! The dashboard only talks to the [`LedgerProvider`] trait. [`MockLedger`]
//! serves the bundled demo records with a simulated network delay; a real
//! backend is a drop-in implementation of the same trait.

use crate::error::LedgerError;
use crate::types::{Profile, Transaction, UserIdentity};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Demo records bundled with the binary.
pub const DEMO_LEDGER_JSON: &str = include_str!("../data/demo_ledger.json");

#[async_trait]
pub trait LedgerProvider: Send + Sync {
    async fn fetch_profile(&self, identity: &UserIdentity) -> Result<Profile, LedgerError>;

    /// Transactions ordered most-recent-first.
    async fn fetch_transactions(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<Transaction>, LedgerError>;
}

/// A profile together with its ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    pub profile: Profile,
    pub transactions: Vec<Transaction>,
}

/// Simulated response times of the mock backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerLatency {
    pub profile: Duration,
    pub transactions: Duration,
}

impl LedgerLatency {
    pub const fn none() -> Self {
        Self {
            profile: Duration::ZERO,
            transactions: Duration::ZERO,
        }
    }
}

impl Default for LedgerLatency {
    fn default() -> Self {
        Self {
            profile: Duration::from_millis(700),
            transactions: Duration::from_millis(1000),
        }
    }
}

/// Sort transactions into canonical most-recent-first order.
///
/// Ties on date and time fall back to the id so the result does not depend
/// on the input order.
pub fn canonical_order(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.time.cmp(&a.time))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// In-memory ledger standing in for a remote backend.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    records: HashMap<UserIdentity, LedgerRecord>,
    latency: LedgerLatency,
}

impl MockLedger {
    pub fn new(latency: LedgerLatency) -> Self {
        Self {
            records: HashMap::new(),
            latency,
        }
    }

    /// Load records from a JSON array of `{ profile, transactions }` objects.
    pub fn from_json(json: &str, latency: LedgerLatency) -> Result<Self, LedgerError> {
        let records: Vec<LedgerRecord> =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidData(e.to_string()))?;
        let mut ledger = Self::new(latency);
        for record in records {
            ledger.insert(record)?;
        }
        Ok(ledger)
    }

    /// The bundled demo ledger with default latency.
    pub fn demo() -> Result<Self, LedgerError> {
        Self::from_json(DEMO_LEDGER_JSON, LedgerLatency::default())
    }

    pub fn with_latency(mut self, latency: LedgerLatency) -> Self {
        self.latency = latency;
        self
    }

    /// Validate a record and store it with its transactions in canonical order.
    pub fn insert(&mut self, mut record: LedgerRecord) -> Result<(), LedgerError> {
        let balance = record.profile.balance;
        if !balance.is_finite() || balance < 0.0 {
            return Err(LedgerError::InvalidData(format!(
                "balance for {} must be a non-negative amount, got {}",
                record.profile.identity, balance
            )));
        }

        let mut seen = HashSet::new();
        for tx in &record.transactions {
            if !seen.insert(tx.id.as_str()) {
                return Err(LedgerError::InvalidData(format!(
                    "duplicate transaction id {}",
                    tx.id
                )));
            }
            if !tx.amount.is_finite() || !tx.direction_consistent() {
                return Err(LedgerError::InvalidData(format!(
                    "transaction {} amount {} does not match category {}",
                    tx.id, tx.amount, tx.category
                )));
            }
        }

        canonical_order(&mut record.transactions);
        tracing::debug!(
            "Loaded ledger for {} ({} transactions)",
            record.profile.identity,
            record.transactions.len()
        );
        self.records
            .insert(record.profile.identity.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LedgerProvider for MockLedger {
    async fn fetch_profile(&self, identity: &UserIdentity) -> Result<Profile, LedgerError> {
        tokio::time::sleep(self.latency.profile).await;
        self.records
            .get(identity)
            .map(|record| record.profile.clone())
            .ok_or(LedgerError::ProfileNotFound)
    }

    async fn fetch_transactions(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<Transaction>, LedgerError> {
        tokio::time::sleep(self.latency.transactions).await;
        self.records
            .get(identity)
            .map(|record| record.transactions.clone())
            .ok_or(LedgerError::TransactionsNotFound)
    }
}
