//! Shared HTTP helpers for the remote collaborators.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;

/// Information about an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotSuccessResponseInfo {
    pub status_code: u16,
    pub text: String,
}

#[async_trait]
pub trait ResponseExt {
    async fn check_success(self) -> Result<Self, NotSuccessResponseInfo>
    where
        Self: Sized;
}

#[async_trait]
impl ResponseExt for Response {
    async fn check_success(self) -> Result<Self, NotSuccessResponseInfo> {
        let status = self.status();
        if !status.is_success() {
            return Err(NotSuccessResponseInfo {
                status_code: status.as_u16(),
                text: self
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read response text".to_string()),
            });
        }
        Ok(self)
    }
}

/// Build the client shared by all HTTP collaborators.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bitprivacy/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}
