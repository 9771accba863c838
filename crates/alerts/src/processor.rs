//! Executes chat actions against the store and the providers.

use crate::command::{Action, Command, MonitorRequest};
use crate::format;
use smartmoney_core::{compute_overlap, CoreError, OverlapStore, TokenId};
use smartmoney_feeds::{scan_token, BuyerFetcher, WebhookRegistrar};
use std::sync::Arc;
use teloxide::utils::command::BotCommands;
use teloxide::utils::html;
use tracing::{info, warn};

/// Text to send back, and whether to attach the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub with_menu: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            with_menu: false,
        }
    }

    pub fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            with_menu: true,
        }
    }
}

/// Runs [`Action`]s. Shared by the text command and button handlers.
pub struct CommandProcessor {
    store: Arc<OverlapStore>,
    fetcher: Arc<dyn BuyerFetcher>,
    registrar: Arc<dyn WebhookRegistrar>,
}

impl CommandProcessor {
    pub fn new(
        store: Arc<OverlapStore>,
        fetcher: Arc<dyn BuyerFetcher>,
        registrar: Arc<dyn WebhookRegistrar>,
    ) -> Self {
        Self {
            store,
            fetcher,
            registrar,
        }
    }

    pub fn store(&self) -> &OverlapStore {
        &self.store
    }

    /// Message to send before a slow action starts, if any.
    pub fn progress_notice(&self, action: &Action) -> Option<String> {
        match action {
            Action::Scan(Some(token)) => Some(format::scanning_notice(token)),
            _ => None,
        }
    }

    pub async fn execute(&self, action: &Action) -> Reply {
        match action {
            Action::Menu => Reply::with_menu(format::welcome_message()),
            Action::Help => Reply::text(html::escape(&Command::descriptions().to_string())),
            Action::Scan(None) => Reply::text(format::scan_usage()),
            Action::Scan(Some(token)) => self.scan(token).await,
            Action::Overlap => self.overlap(),
            Action::Monitor(None) => Reply::text(format::monitor_usage()),
            Action::Monitor(Some(request)) => self.monitor(request).await,
        }
    }

    async fn scan(&self, token: &TokenId) -> Reply {
        match scan_token(self.fetcher.as_ref(), &self.store, token).await {
            Ok(buyers) => Reply::text(format::scan_result(&buyers)),
            Err(e) => Reply::text(format::error_message(&e)),
        }
    }

    fn overlap(&self) -> Reply {
        match compute_overlap(&self.store) {
            Ok(overlap) => {
                info!(
                    tokens = overlap.tokens_compared,
                    common = overlap.len(),
                    "Overlap computed"
                );
                Reply::text(format::overlap_result(&overlap))
            }
            Err(CoreError::InsufficientData { tracked }) => {
                Reply::text(format::insufficient_data(tracked))
            }
            Err(e) => {
                warn!(error = %e, "Overlap failed");
                Reply::text(format!("❌ Error: {}", e))
            }
        }
    }

    async fn monitor(&self, request: &MonitorRequest) -> Reply {
        match self
            .registrar
            .register_wallet(&request.wallet, &request.callback_base)
            .await
        {
            Ok(webhook_id) => Reply::text(format::monitoring_started(&request.wallet, &webhook_id)),
            Err(e) => {
                warn!(wallet = %request.wallet, error = %e, "Webhook registration failed");
                Reply::text(format::monitor_failed(&e))
            }
        }
    }
}
