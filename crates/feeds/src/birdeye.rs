//! Birdeye token market-data client.
//!
//! Only used as a liveness check: a mint Birdeye has no market data for is
//! rejected before the transfer history is pulled.

use crate::error::{FeedError, FeedResult};
use crate::fetcher::TokenDataSource;
use crate::{build_http_client, check_status};
use async_trait::async_trait;
use serde::Deserialize;
use smartmoney_core::TokenId;
use tracing::debug;

const PROVIDER: &str = "Birdeye";

/// Market-data envelope. Only the success flag is inspected.
#[derive(Debug, Deserialize)]
struct MarketDataResponse {
    #[serde(default)]
    success: bool,
}

/// Birdeye REST client.
#[derive(Debug, Clone)]
pub struct BirdeyeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl BirdeyeClient {
    pub const BASE_URL: &'static str = "https://public-api.birdeye.so";

    pub fn new(api_key: impl Into<String>) -> FeedResult<Self> {
        Ok(Self {
            http: build_http_client(PROVIDER)?,
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (e.g. a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn market_data_url(&self) -> String {
        format!("{}/defi/v3/token/market-data", self.base_url)
    }

    /// Check that Birdeye knows `token`.
    pub async fn check_token(&self, token: &TokenId) -> FeedResult<()> {
        let response = self
            .http
            .get(self.market_data_url())
            .query(&[("address", token.as_str())])
            .header("X-API-KEY", &self.api_key)
            .header("x-chain", "solana")
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        parse_market_data(token, &body)
    }
}

fn parse_market_data(token: &TokenId, body: &str) -> FeedResult<()> {
    let parsed: MarketDataResponse =
        serde_json::from_str(body).map_err(|e| FeedError::ParseError {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

    if !parsed.success {
        debug!(token = %token, "Birdeye has no market data");
        return Err(FeedError::TokenNotFound(token.to_string()));
    }
    Ok(())
}

#[async_trait]
impl TokenDataSource for BirdeyeClient {
    async fn check_token(&self, token: &TokenId) -> FeedResult<()> {
        BirdeyeClient::check_token(self, token).await
    }
}
