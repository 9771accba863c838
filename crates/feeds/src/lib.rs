//! Data provider clients for the smart money bot.
//!
//! This crate provides:
//! - Birdeye token market-data checks
//! - Helius transfer history and webhook registration
//! - The buyer fetcher used by token scans

pub mod birdeye;
pub mod error;
pub mod fetcher;
pub mod helius;

pub use birdeye::BirdeyeClient;
pub use error::{FeedError, FeedResult};
pub use fetcher::{
    scan_token, BuyerFetcher, ProviderBuyerFetcher, TokenDataSource, TransferHistory,
    WebhookRegistrar, MAX_BUYERS,
};
pub use helius::{extract_buyers, webhook_callback_url, EnhancedTransaction, HeliusClient, TokenTransfer};

use std::time::Duration;

/// Timeout applied to every provider request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_http_client(provider: &'static str) -> FeedResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| FeedError::from_reqwest(provider, e))
}

/// Turn a non-success response into a `FeedError`, passing successes through.
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> FeedResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(FeedError::from_status(provider, status.as_u16(), body))
}
