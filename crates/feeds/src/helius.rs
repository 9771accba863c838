//! Helius enhanced-transaction and webhook client.

use crate::error::{FeedError, FeedResult};
use crate::fetcher::{TransferHistory, WebhookRegistrar};
use crate::{build_http_client, check_status};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smartmoney_core::{TokenId, WalletAddress};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

const PROVIDER: &str = "Helius";

/// Page size requested from the transaction history endpoint.
pub const HISTORY_PAGE_LIMIT: usize = 50;

/// Path the webhook server listens on for Helius deliveries.
pub const WEBHOOK_PATH: &str = "/helius";

/// One SPL token movement inside an enhanced transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
}

/// Enhanced transaction as returned by the history API and pushed by
/// enhanced webhooks. Fields Helius may omit or null are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub tx_type: Option<String>,
    /// Block time in unix seconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub token_transfers: Option<Vec<TokenTransfer>>,
}

impl EnhancedTransaction {
    pub fn transfers(&self) -> &[TokenTransfer] {
        self.token_transfers.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateWebhookRequest<'a> {
    #[serde(rename = "webhookURL")]
    webhook_url: &'a str,
    transaction_types: [&'a str; 1],
    account_addresses: [&'a str; 1],
    webhook_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateWebhookResponse {
    #[serde(rename = "webhookID")]
    webhook_id: String,
}

/// Collect up to `limit` distinct recipients of `mint` transfers.
///
/// Transactions are walked oldest first so the earliest buyers come first.
/// Transactions without a timestamp keep their relative position after the
/// timestamped ones.
pub fn extract_buyers(
    transactions: &[EnhancedTransaction],
    mint: &TokenId,
    limit: usize,
) -> Vec<WalletAddress> {
    let mut ordered: Vec<&EnhancedTransaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| tx.timestamp.unwrap_or(i64::MAX));

    let mut seen = HashSet::new();
    let mut buyers = Vec::new();

    'outer: for tx in ordered {
        for transfer in tx.transfers() {
            if buyers.len() >= limit {
                break 'outer;
            }
            if transfer.mint.as_deref() != Some(mint.as_str()) {
                continue;
            }
            let Some(recipient) = transfer.to_user_account.as_deref() else {
                continue;
            };
            let Ok(wallet) = WalletAddress::new(recipient) else {
                continue;
            };
            if seen.insert(wallet.clone()) {
                buyers.push(wallet);
            }
        }
    }

    buyers
}

/// Build the Helius delivery URL from the public base URL of this server.
pub fn webhook_callback_url(base: &str) -> FeedResult<String> {
    let trimmed = base.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FeedError::InvalidInput(format!(
            "callback URL must be http(s), got {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(FeedError::InvalidInput("callback URL has no host".to_string()));
    }

    Ok(format!("{}{}", trimmed, WEBHOOK_PATH))
}

/// Helius REST client.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HeliusClient {
    pub const BASE_URL: &'static str = "https://api.helius.xyz";

    pub fn new(api_key: impl Into<String>) -> FeedResult<Self> {
        Ok(Self {
            http: build_http_client(PROVIDER)?,
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn history_url(&self, mint: &TokenId) -> String {
        format!("{}/v0/addresses/{}/transactions", self.base_url, mint)
    }

    fn webhooks_url(&self) -> String {
        format!("{}/v0/webhooks", self.base_url)
    }

    /// Fetch the latest page of TRANSFER transactions touching `mint`.
    pub async fn fetch_transfers(&self, mint: &TokenId) -> FeedResult<Vec<EnhancedTransaction>> {
        let limit = HISTORY_PAGE_LIMIT.to_string();
        let response = self
            .http
            .get(self.history_url(mint))
            .query(&[
                ("api-key", self.api_key.as_str()),
                ("type", "TRANSFER"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let transactions: Vec<EnhancedTransaction> = response
            .json()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        debug!(mint = %mint, count = transactions.len(), "Fetched transfer history");
        Ok(transactions)
    }

    /// Register an enhanced webhook for `wallet`. Returns the webhook id.
    pub async fn create_webhook(&self, wallet: &WalletAddress, callback_base: &str) -> FeedResult<String> {
        let webhook_url = webhook_callback_url(callback_base)?;
        let request = CreateWebhookRequest {
            webhook_url: &webhook_url,
            transaction_types: ["ANY"],
            account_addresses: [wallet.as_str()],
            webhook_type: "enhanced",
        };

        let response = self
            .http
            .post(self.webhooks_url())
            .query(&[("api-key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let created: CreateWebhookResponse = response
            .json()
            .await
            .map_err(|e| FeedError::from_reqwest(PROVIDER, e))?;

        info!(
            wallet = %wallet,
            webhook_id = %created.webhook_id,
            url = %webhook_url,
            "Helius webhook created"
        );
        Ok(created.webhook_id)
    }
}

#[async_trait]
impl TransferHistory for HeliusClient {
    async fn fetch_transfers(&self, mint: &TokenId) -> FeedResult<Vec<EnhancedTransaction>> {
        HeliusClient::fetch_transfers(self, mint).await
    }
}

#[async_trait]
impl WebhookRegistrar for HeliusClient {
    async fn register_wallet(&self, wallet: &WalletAddress, callback_base: &str) -> FeedResult<String> {
        self.create_webhook(wallet, callback_base).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINT: &str = "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr";
    const OTHER: &str = "So11111111111111111111111111111111111111112";

    fn mint() -> TokenId {
        TokenId::new(MINT).unwrap()
    }

    fn tx(ts: Option<i64>, transfers: &[(&str, Option<&str>)]) -> EnhancedTransaction {
        EnhancedTransaction {
            timestamp: ts,
            token_transfers: Some(
                transfers
                    .iter()
                    .map(|(m, to)| TokenTransfer {
                        mint: Some(m.to_string()),
                        from_user_account: None,
                        to_user_account: to.map(str::to_string),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn names(wallets: &[WalletAddress]) -> Vec<&str> {
        wallets.iter().map(|w| w.as_str()).collect()
    }

    #[test]
    fn test_parse_history_payload() {
        let body = r#"[
            {
                "signature": "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv",
                "description": "HXs transferred 100 BONK to 9Wz",
                "type": "TRANSFER",
                "timestamp": 1700000000,
                "tokenTransfers": [
                    {"mint": "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", "fromUserAccount": "HXs", "toUserAccount": "9Wz", "tokenAmount": 100}
                ],
                "nativeTransfers": []
            },
            {"signature": "abc", "tokenTransfers": null}
        ]"#;

        let txs: Vec<EnhancedTransaction> = serde_json::from_str(body).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].tx_type.as_deref(), Some("TRANSFER"));
        assert_eq!(txs[0].transfers()[0].to_user_account.as_deref(), Some("9Wz"));
        assert!(txs[1].transfers().is_empty());
    }

    #[test]
    fn test_extract_filters_by_mint() {
        let txs = vec![tx(Some(1), &[(OTHER, Some("W0")), (MINT, Some("W1"))])];
        assert_eq!(names(&extract_buyers(&txs, &mint(), 20)), vec!["W1"]);
    }

    #[test]
    fn test_extract_orders_oldest_first_and_dedups() {
        let txs = vec![
            tx(Some(300), &[(MINT, Some("W3")), (MINT, Some("W1"))]),
            tx(Some(100), &[(MINT, Some("W1"))]),
            tx(None, &[(MINT, Some("W9"))]),
            tx(Some(200), &[(MINT, Some("W2")), (MINT, None)]),
        ];
        assert_eq!(
            names(&extract_buyers(&txs, &mint(), 20)),
            vec!["W1", "W2", "W3", "W9"]
        );
    }

    #[test]
    fn test_extract_caps_at_limit() {
        let recipients: Vec<String> = (0..30).map(|i| format!("W{:02}", i)).collect();
        let txs: Vec<EnhancedTransaction> = recipients
            .iter()
            .enumerate()
            .map(|(i, w)| tx(Some(i as i64), &[(MINT, Some(w.as_str()))]))
            .collect();

        let buyers = extract_buyers(&txs, &mint(), 20);
        assert_eq!(buyers.len(), 20);
        assert_eq!(buyers[0].as_str(), "W00");
        assert_eq!(buyers[19].as_str(), "W19");
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            webhook_callback_url("https://abc123.ngrok-free.app/").unwrap(),
            "https://abc123.ngrok-free.app/helius"
        );
        assert_eq!(
            webhook_callback_url("http://localhost:5000").unwrap(),
            "http://localhost:5000/helius"
        );
    }

    #[test]
    fn test_callback_url_rejects_bad_input() {
        assert!(matches!(
            webhook_callback_url("not a url"),
            Err(FeedError::InvalidInput(_))
        ));
        assert!(matches!(
            webhook_callback_url("ftp://example.com"),
            Err(FeedError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_webhook_request_shape() {
        let request = CreateWebhookRequest {
            webhook_url: "https://example.com/helius",
            transaction_types: ["ANY"],
            account_addresses: ["W1"],
            webhook_type: "enhanced",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "webhookURL": "https://example.com/helius",
                "transactionTypes": ["ANY"],
                "accountAddresses": ["W1"],
                "webhookType": "enhanced"
            })
        );
    }

    #[test]
    fn test_urls() {
        let client = HeliusClient::new("key").unwrap().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            client.history_url(&mint()),
            format!("http://127.0.0.1:9000/v0/addresses/{}/transactions", MINT)
        );
        assert_eq!(client.webhooks_url(), "http://127.0.0.1:9000/v0/webhooks");
    }
}
