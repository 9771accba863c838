//! Early-buyer fetching and the scan operation.

use crate::error::FeedResult;
use crate::helius::{extract_buyers, EnhancedTransaction};
use async_trait::async_trait;
use smartmoney_core::{OverlapStore, TokenId, WalletAddress};
use tracing::{info, warn};

/// Maximum number of early buyers kept per token.
pub const MAX_BUYERS: usize = 20;

/// Token liveness check against a market-data provider.
#[async_trait]
pub trait TokenDataSource: Send + Sync {
    async fn check_token(&self, token: &TokenId) -> FeedResult<()>;
}

/// Transfer history for a token mint.
#[async_trait]
pub trait TransferHistory: Send + Sync {
    async fn fetch_transfers(&self, mint: &TokenId) -> FeedResult<Vec<EnhancedTransaction>>;
}

/// Source of early buyers for a token.
#[async_trait]
pub trait BuyerFetcher: Send + Sync {
    /// Up to [`MAX_BUYERS`] distinct recipients, earliest first.
    async fn fetch_buyers(&self, token: &TokenId) -> FeedResult<Vec<WalletAddress>>;
}

/// Registers wallet activity webhooks.
#[async_trait]
pub trait WebhookRegistrar: Send + Sync {
    /// Returns the provider's webhook id.
    async fn register_wallet(&self, wallet: &WalletAddress, callback_base: &str) -> FeedResult<String>;
}

/// Buyer fetcher backed by a market-data check followed by transfer history.
pub struct ProviderBuyerFetcher<D, H> {
    token_data: D,
    history: H,
    max_buyers: usize,
}

impl<D, H> ProviderBuyerFetcher<D, H>
where
    D: TokenDataSource,
    H: TransferHistory,
{
    pub fn new(token_data: D, history: H) -> Self {
        Self {
            token_data,
            history,
            max_buyers: MAX_BUYERS,
        }
    }
}

#[async_trait]
impl<D, H> BuyerFetcher for ProviderBuyerFetcher<D, H>
where
    D: TokenDataSource,
    H: TransferHistory,
{
    async fn fetch_buyers(&self, token: &TokenId) -> FeedResult<Vec<WalletAddress>> {
        self.token_data.check_token(token).await?;
        let transactions = self.history.fetch_transfers(token).await?;
        Ok(extract_buyers(&transactions, token, self.max_buyers))
    }
}

/// Fetch early buyers for `token` and record them in `store`.
///
/// The store is only written when the fetch succeeds, so a failed scan
/// leaves any earlier result for the token in place.
pub async fn scan_token(
    fetcher: &dyn BuyerFetcher,
    store: &OverlapStore,
    token: &TokenId,
) -> FeedResult<Vec<WalletAddress>> {
    let buyers = match fetcher.fetch_buyers(token).await {
        Ok(buyers) => buyers,
        Err(e) => {
            warn!(token = %token, error = %e, "Scan failed");
            return Err(e);
        }
    };

    store.record(token.clone(), buyers.iter().cloned());
    info!(
        token = %token,
        buyers = buyers.len(),
        tracked_tokens = store.count(),
        "Scan recorded"
    );
    Ok(buyers)
}
