//! Wallet activity alert relay.
//!
//! Webhook deliveries are queued on a bounded channel and forwarded to the
//! alert chat by a background task, so the HTTP handler never waits on
//! Telegram.

use crate::format::activity_alert;
use async_trait::async_trait;
use smartmoney_feeds::EnhancedTransaction;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_DESCRIPTION: &str = "New Activity Detected";
pub const DEFAULT_SIGNATURE: &str = "N/A";

/// Default queue depth for pending alerts.
pub const RELAY_CHANNEL_CAPACITY: usize = 100;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Alert queue is full")]
    QueueFull,
    #[error("Alert relay stopped")]
    ChannelClosed,
}

/// One on-chain activity to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub description: String,
    pub signature: String,
}

impl From<&EnhancedTransaction> for ActivityEvent {
    fn from(tx: &EnhancedTransaction) -> Self {
        let description = tx
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);
        let signature = tx
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SIGNATURE);

        Self {
            description: description.to_string(),
            signature: signature.to_string(),
        }
    }
}

/// Destination for formatted alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, message: &str) -> Result<(), RelayError>;
}

/// Cloneable handle for queueing alerts from request handlers.
#[derive(Clone)]
pub struct AlertRelayHandle {
    tx: mpsc::Sender<ActivityEvent>,
}

impl AlertRelayHandle {
    pub fn new(tx: mpsc::Sender<ActivityEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event, waiting for room if the queue is full.
    pub async fn send(&self, event: ActivityEvent) -> Result<(), RelayError> {
        self.tx.send(event).await.map_err(|_| RelayError::ChannelClosed)
    }

    /// Queue an event without waiting.
    pub fn try_send(&self, event: ActivityEvent) -> Result<(), RelayError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => RelayError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => RelayError::ChannelClosed,
        })
    }
}

/// Forward queued events to `sink` until every handle is dropped.
///
/// Returns the number of alerts delivered.
pub async fn run_alert_relay(sink: Arc<dyn AlertSink>, mut rx: mpsc::Receiver<ActivityEvent>) -> u64 {
    info!("Alert relay started");
    let mut delivered = 0u64;

    while let Some(event) = rx.recv().await {
        let message = activity_alert(&event, chrono::Utc::now());
        match sink.send_alert(&message).await {
            Ok(()) => {
                delivered += 1;
                debug!(signature = %event.signature, "Alert sent");
            }
            Err(e) => {
                error!(signature = %event.signature, error = %e, "Failed to send alert");
            }
        }
    }

    info!(delivered, "Alert relay stopped");
    delivered
}

/// Start the relay background task.
/// Returns a handle that can be cloned and used to queue events.
pub fn start_alert_relay(sink: Arc<dyn AlertSink>, capacity: usize) -> AlertRelayHandle {
    let (tx, rx) = mpsc::channel::<ActivityEvent>(capacity.max(1));

    tokio::spawn(async move {
        let delivered = run_alert_relay(sink, rx).await;
        if delivered == 0 {
            warn!("Alert relay exited without delivering any alerts");
        }
    });

    AlertRelayHandle::new(tx)
}
