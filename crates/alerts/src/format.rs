//! Chat message formatting. All messages use Telegram HTML parse mode.

use crate::relay::ActivityEvent;
use chrono::{DateTime, Utc};
use smartmoney_core::{Overlap, TokenId, WalletAddress};
use smartmoney_feeds::FeedError;
use teloxide::utils::html::escape;

const SOLSCAN_TX_URL: &str = "https://solscan.io/tx/";

pub fn welcome_message() -> String {
    "🔫 <b>Solana Smart Money Bot Ready</b>\n\nTap a button below to get started.".to_string()
}

pub fn scan_usage() -> String {
    "🔎 <b>To scan a token:</b>\n\n\
     Type the command and paste the mint address:\n\
     <code>/scan [mint_address]</code>"
        .to_string()
}

pub fn monitor_usage() -> String {
    "👀 <b>To monitor a wallet:</b>\n\n\
     Type the command followed by the wallet and your public HTTPS URL:\n\
     <code>/monitor [wallet] [callback_url]</code>"
        .to_string()
}

pub fn scanning_notice(token: &TokenId) -> String {
    format!("🔎 Scanning mint: <code>{}</code>...", escape(token.as_str()))
}

pub fn scan_result(buyers: &[WalletAddress]) -> String {
    let mut msg = format!("✅ <b>Found {} First Buyers</b>\n\n", buyers.len());
    let lines: Vec<String> = buyers
        .iter()
        .map(|b| format!("<code>{}</code>", escape(b.as_str())))
        .collect();
    msg.push_str(&lines.join("\n\n"));
    if !lines.is_empty() {
        msg.push_str("\n\n");
    }
    msg.push_str("(Saved for overlap analysis)");
    msg
}

pub fn insufficient_data(tracked: usize) -> String {
    format!(
        "⚠️ Scan at least 2 different tokens first using <code>/scan</code>! \
         ({} scanned so far)",
        tracked
    )
}

pub fn overlap_result(overlap: &Overlap) -> String {
    if overlap.is_empty() {
        return format!(
            "📉 No common wallets found across {} tokens (Overlap = 0).",
            overlap.tokens_compared
        );
    }

    let mut msg = format!(
        "🎯 <b>SMART MONEY FOUND ({})</b>\nCommon to all {} scanned tokens\n\n",
        overlap.len(),
        overlap.tokens_compared
    );
    let lines: Vec<String> = overlap
        .wallets
        .iter()
        .map(|w| format!("• <code>{}</code>", escape(w.as_str())))
        .collect();
    msg.push_str(&lines.join("\n\n"));
    msg
}

pub fn monitoring_started(wallet: &WalletAddress, webhook_id: &str) -> String {
    format!(
        "👀 <b>Now Monitoring:</b> <code>{}</code>\nWebhook: <code>{}</code>",
        escape(wallet.as_str()),
        escape(webhook_id)
    )
}

pub fn monitor_failed(err: &FeedError) -> String {
    format!("❌ Failed to create webhook: {}", escape(&err.to_string()))
}

pub fn error_message(err: &FeedError) -> String {
    format!("❌ Error: {}", escape(&err.to_string()))
}

/// Format one webhook activity record as a chat alert.
pub fn activity_alert(event: &ActivityEvent, now: DateTime<Utc>) -> String {
    format!(
        "🚨 <b>SMART MONEY ALERT</b> 🚨\n\n\
         <b>Activity:</b> {}\n\
         <b>Tx:</b> <a href=\"{}{}\">View on Solscan</a>\n\n\
         ⏰ {}",
        escape(&event.description),
        SOLSCAN_TX_URL,
        escape(&event.signature),
        now.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
