//! HTTP server receiving Helius wallet activity webhooks.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use smartmoney_alerts::{ActivityEvent, AlertRelayHandle};
use smartmoney_feeds::EnhancedTransaction;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state for webhook handlers.
pub struct WebhookState {
    relay: AlertRelayHandle,
}

impl WebhookState {
    pub fn new(relay: AlertRelayHandle) -> Self {
        Self { relay }
    }
}

type WebhookResponse = (StatusCode, Json<Value>);

fn success() -> WebhookResponse {
    (StatusCode::OK, Json(json!({ "status": "success" })))
}

fn failure() -> WebhookResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "status": "error" })))
}

/// Decode a delivery body into activity events.
///
/// Helius posts a JSON array; any other JSON value carries no activity.
fn parse_delivery(body: &[u8]) -> Result<Vec<ActivityEvent>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value::<EnhancedTransaction>(item).map(|tx| ActivityEvent::from(&tx)))
        .collect()
}

/// Helius delivery handler.
pub async fn helius_webhook(State(state): State<Arc<WebhookState>>, body: Bytes) -> WebhookResponse {
    let events = match parse_delivery(&body) {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "Rejected malformed webhook delivery");
            return failure();
        }
    };

    info!(events = events.len(), "Received Helius webhook");

    for event in events {
        if let Err(e) = state.relay.send(event).await {
            error!(error = %e, "Failed to queue alert");
            return failure();
        }
    }

    success()
}

/// Health check handler.
async fn health_handler() -> &'static str {
    "OK"
}

pub fn create_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/helius", post(helius_webhook))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the webhook server and serve it in the background.
pub async fn start_webhook_server(
    state: Arc<WebhookState>,
    port: u16,
) -> Result<SocketAddr, std::io::Error> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Webhook server listening on http://{}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Webhook server error: {}", e);
        }
    });

    Ok(local_addr)
}
