//! BTC→USD price oracle.
//!
//! A failed price lookup never fails the dashboard: [`rate_or_fallback`]
//! substitutes the configured fallback rate and only logs the failure.

use crate::error::PriceError;
use crate::http::ResponseExt;
use async_trait::async_trait;

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current BTC→USD rate, strictly positive.
    async fn fetch_rate(&self) -> Result<f64, PriceError>;
}

/// Settled state of the exchange rate as seen by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateState {
    /// Not loaded yet.
    #[default]
    Unknown,
    Live(f64),
    /// The oracle failed and the fallback constant is in use.
    Fallback(f64),
}

impl RateState {
    pub fn effective(&self) -> Option<f64> {
        match self {
            RateState::Unknown => None,
            RateState::Live(rate) | RateState::Fallback(rate) => Some(*rate),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RateState::Unknown)
    }
}

/// Query the oracle, substituting `fallback` on any failure.
pub async fn rate_or_fallback(oracle: &dyn PriceOracle, fallback: f64) -> RateState {
    match oracle.fetch_rate().await {
        Ok(rate) => {
            tracing::debug!("BTC price: {} USD", rate);
            RateState::Live(rate)
        }
        Err(e) => {
            tracing::warn!("Could not fetch BTC price, using fallback {}: {}", fallback, e);
            RateState::Fallback(fallback)
        }
    }
}

/// Price oracle backed by the CoinGecko simple price endpoint.
pub struct CoinGeckoOracle {
    client: reqwest::Client,
    url: String,
}

impl CoinGeckoOracle {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn fetch_rate(&self) -> Result<f64, PriceError> {
        let data: serde_json::Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PriceError::RequestFailed(e.to_string()))?
            .check_success()
            .await
            .map_err(PriceError::NotSuccessResponse)?
            .json()
            .await
            .map_err(|e| PriceError::CannotParseResponse(e.to_string()))?;
        parse_price_data(&data)
    }
}

/// Extract `bitcoin.usd` from a CoinGecko simple price payload.
pub fn parse_price_data(data: &serde_json::Value) -> Result<f64, PriceError> {
    let rate = data
        .get("bitcoin")
        .and_then(|coin| coin.get("usd"))
        .and_then(|usd| usd.as_f64())
        .ok_or_else(|| PriceError::CannotParseData(format!("missing bitcoin.usd in {}", data)))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(PriceError::NonPositiveRate(rate));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_client;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    struct FailingOracle;

    #[async_trait]
    impl PriceOracle for FailingOracle {
        async fn fetch_rate(&self) -> Result<f64, PriceError> {
            Err(PriceError::RequestFailed("network unreachable".into()))
        }
    }

    fn oracle_for(server: &MockServer) -> CoinGeckoOracle {
        let client = build_client(Duration::from_secs(5)).unwrap();
        CoinGeckoOracle::new(client, server.url("/simple/price?ids=bitcoin&vs_currencies=usd"))
    }

    // ==================== RateState tests ====================

    #[test]
    fn test_rate_state_effective() {
        assert_eq!(RateState::Unknown.effective(), None);
        assert_eq!(RateState::Live(61000.0).effective(), Some(61000.0));
        assert_eq!(RateState::Fallback(65000.0).effective(), Some(65000.0));
        assert!(!RateState::default().is_known());
    }

    // ==================== parse_price_data tests ====================

    #[test]
    fn test_parse_price_data_ok() {
        let rate = parse_price_data(&json!({"bitcoin": {"usd": 67123.5}})).unwrap();
        assert_eq!(rate, 67123.5);
    }

    #[test]
    fn test_parse_price_data_missing_field() {
        let err = parse_price_data(&json!({"ethereum": {"usd": 3000}})).unwrap_err();
        assert!(matches!(err, PriceError::CannotParseData(_)));
    }

    #[test]
    fn test_parse_price_data_rejects_zero() {
        let err = parse_price_data(&json!({"bitcoin": {"usd": 0}})).unwrap_err();
        assert!(matches!(err, PriceError::NonPositiveRate(_)));
    }

    // ==================== fallback tests ====================

    #[tokio::test]
    async fn test_rate_or_fallback_on_failure() {
        let state = rate_or_fallback(&FailingOracle, 65000.0).await;
        assert_eq!(state, RateState::Fallback(65000.0));
    }

    #[tokio::test]
    async fn test_coingecko_live_rate() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/simple/price")
                    .query_param("ids", "bitcoin")
                    .query_param("vs_currencies", "usd");
                then.status(200).json_body(json!({"bitcoin": {"usd": 64250.0}}));
            })
            .await;

        let state = rate_or_fallback(&oracle_for(&server), 65000.0).await;
        mock.assert_async().await;
        assert_eq!(state, RateState::Live(64250.0));
    }

    #[tokio::test]
    async fn test_coingecko_server_error_uses_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(500).body("internal error");
            })
            .await;

        let oracle = oracle_for(&server);
        let err = oracle.fetch_rate().await.unwrap_err();
        assert!(matches!(err, PriceError::NotSuccessResponse(ref info) if info.status_code == 500));
        assert_eq!(
            rate_or_fallback(&oracle, 65000.0).await,
            RateState::Fallback(65000.0)
        );
    }

    #[tokio::test]
    async fn test_coingecko_malformed_payload_uses_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).body("<html>rate limited</html>");
            })
            .await;

        let oracle = oracle_for(&server);
        assert!(matches!(
            oracle.fetch_rate().await,
            Err(PriceError::CannotParseResponse(_))
        ));
        assert_eq!(
            rate_or_fallback(&oracle, 65000.0).await,
            RateState::Fallback(65000.0)
        );
    }
}
