//! Web server module: the HTTP surface in front of the dispatch pipeline.
//!
//! The route handler does no validation of its own. It wraps the raw request
//! into the envelope shape the entry adapter understands, so every input
//! (HTTP or otherwise) goes through the same normalization path.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dispatch::{self, Registry};
use crate::forward::Forwarder;
use crate::response::{GatewayResponse, MSG_INTERNAL_ERROR};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub forwarder: Arc<Forwarder>,
}

impl AppState {
    pub fn new(config: Config, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(Registry::new()),
            forwarder: Arc::new(forwarder),
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Navision webhook endpoint.
///
/// Accepts the body as raw bytes: string-encoded JSON, envelope objects and
/// bare bodies are all legal inputs, so parsing is left to the entry adapter.
pub async fn navision_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> GatewayResponse {
    info!(body_bytes = body.len(), "webhook_received");

    let event = json!({
        "body": String::from_utf8_lossy(&body),
        "headers": header_map_to_json(&headers),
    });

    let (body, headers) = crate::event::read_event(&event);
    dispatch::dispatch(&state.registry, &state.forwarder, &body, &headers).await
}

/// Convert HTTP headers to the JSON map shape the dispatcher reads.
///
/// Header names arrive lowercased, which the dispatcher's `x-api-key`
/// fallback covers.
fn header_map_to_json(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, value) in headers {
        if let Ok(text) = value.to_str() {
            map.insert(name.as_str().to_string(), Value::String(text.to_string()));
        }
    }
    map
}

/// Build the router with tracing and the outermost panic boundary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/navision", post(navision_webhook))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Last-resort boundary: any panic in the pipeline becomes a generic 500.
/// Internal detail is logged, never sent to the caller.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    error!(detail = %detail, "unhandled_panic");

    GatewayResponse::erro(
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        MSG_INTERNAL_ERROR,
    )
    .into_response()
}
