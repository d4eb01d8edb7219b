use crate::insights::SummarizerConfig;
use std::env;
use std::time::Duration;
use url::Url;

/// Receive address shown in the receive flow.
pub const DEFAULT_WALLET_ADDRESS: &str = "37T14ky2anWmM3GyaLEMER8fxyLhcGUKAY";

/// BTC→USD rate used whenever the price feed cannot be reached.
pub const FALLBACK_BTC_USD_RATE: f64 = 65000.0;

pub const DEFAULT_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd";

pub const DEFAULT_QR_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

pub const DEFAULT_EXPLORER_URL: &str = "https://mempool.space";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub wallet_address: String,
    pub price_url: String,
    pub qr_url: String,
    pub explorer_url: String,
    pub fallback_rate: f64,
    pub http_timeout: Duration,
    pub summarizer: SummarizerConfig,
}

impl Config {
    /// Build from process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let wallet_address =
            non_empty("BITPRIVACY_WALLET_ADDRESS").unwrap_or_else(|| DEFAULT_WALLET_ADDRESS.to_string());
        let price_url = valid_url(non_empty("BITPRIVACY_PRICE_URL"), DEFAULT_PRICE_URL, "BITPRIVACY_PRICE_URL");
        let qr_url = valid_url(non_empty("BITPRIVACY_QR_URL"), DEFAULT_QR_URL, "BITPRIVACY_QR_URL");
        let explorer_url = valid_url(
            non_empty("BITPRIVACY_EXPLORER_URL"),
            DEFAULT_EXPLORER_URL,
            "BITPRIVACY_EXPLORER_URL",
        );

        let fallback_rate = match non_empty("BITPRIVACY_FALLBACK_RATE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
                _ => {
                    tracing::warn!(
                        "Ignoring BITPRIVACY_FALLBACK_RATE={}: expected a positive number",
                        raw
                    );
                    FALLBACK_BTC_USD_RATE
                }
            },
            None => FALLBACK_BTC_USD_RATE,
        };

        let timeout_secs = match non_empty("BITPRIVACY_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        "Ignoring BITPRIVACY_HTTP_TIMEOUT_SECS={}: expected a positive integer",
                        raw
                    );
                    DEFAULT_HTTP_TIMEOUT_SECS
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let summarizer = SummarizerConfig::from_lookup(&lookup);

        Self {
            wallet_address,
            price_url,
            qr_url,
            explorer_url,
            fallback_rate,
            http_timeout: Duration::from_secs(timeout_secs),
            summarizer,
        }
    }

    /// Explorer page for a transaction hash.
    pub fn tx_explorer_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }

    /// Explorer page for an address.
    pub fn address_explorer_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url.trim_end_matches('/'), address)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn valid_url(candidate: Option<String>, default: &str, key: &str) -> String {
    match candidate {
        Some(raw) => match Url::parse(&raw) {
            Ok(_) => raw,
            Err(e) => {
                tracing::warn!("Ignoring {}={}: {}", key, raw, e);
                default.to_string()
            }
        },
        None => default.to_string(),
    }
}
