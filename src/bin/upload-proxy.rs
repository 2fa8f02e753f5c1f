//! Upload proxy fronting the storage fanout.
//!
//! Browser contexts often cannot reach storage nodes directly (payload
//! size limits, CORS, mixed content), so this small server accepts the
//! payload and performs the same ordered failover the library client
//! would.
//!
//! Routes:
//!   POST /api/upload  body = payload bytes
//!     200 -> the storage network's native JSON
//!     400 -> empty body
//!     503 -> every node failed; body lists per-node diagnostics
//!   (anything but POST answers 405 via method routing)
//!
//! Configuration via environment:
//!   RENTVAULT_PUBLISHERS   comma-separated publisher base URLs
//!   RENTVAULT_AGGREGATORS  comma-separated aggregator base URLs
//!   RENTVAULT_PROXY_PORT   listen port (default 3001)

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentvault::config::{DEFAULT_STORAGE_EPOCHS, UPLOAD_PROXY_PORT};
use rentvault::{HttpBlobNode, StorageConfig, StorageFanout, VaultError};

struct ProxyState {
    fanout: StorageFanout<HttpBlobNode>,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn urls_from_env(var: &str) -> Vec<String> {
    std::env::var(var)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

async fn handle_upload(State(state): State<Arc<ProxyState>>, body: Bytes) -> Response {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "empty body"})),
        )
            .into_response();
    }

    match state.fanout.upload(&body, DEFAULT_STORAGE_EPOCHS).await {
        Ok(receipt) => {
            info!(blob_id = %receipt.blob_id, "proxied upload of {} bytes", body.len());
            Json(receipt.raw).into_response()
        }
        Err(VaultError::AllNodesFailed { failures, .. }) => {
            warn!("upload exhausted all {} nodes", failures.len());
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "all storage nodes failed",
                    "details": failures,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("unexpected upload failure: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = StorageConfig {
        publishers: urls_from_env("RENTVAULT_PUBLISHERS"),
        aggregators: urls_from_env("RENTVAULT_AGGREGATORS"),
        ..StorageConfig::default()
    };
    if config.publishers.is_empty() {
        anyhow::bail!("RENTVAULT_PUBLISHERS must name at least one publisher URL");
    }

    let state = Arc::new(ProxyState {
        fanout: config.build()?,
    });

    let app = Router::new()
        .route("/api/upload", post(handle_upload))
        .with_state(state);

    let port: u16 = std::env::var("RENTVAULT_PROXY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(UPLOAD_PROXY_PORT);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("upload proxy listening on port {port}");
    axum::serve(listener, app).await?;

    Ok(())
}
