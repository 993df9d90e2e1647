//! Dispatcher: authentication, event-type routing, response mapping.
//!
//! The registry is built once at startup and is read-only afterwards; it is
//! passed into `dispatch` by reference instead of living in global state.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::warn;

use crate::forward::Forwarder;
use crate::handlers::acessos;
use crate::response::{request_error, GatewayResponse, MSG_UNAUTHORIZED};

/// The validation+forwarding pipeline registered for one event type.
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    Acessos,
}

/// Static mapping from `event_type` to its handler.
#[derive(Debug, Clone)]
pub struct Registry {
    handlers: HashMap<&'static str, Handler>,
}

impl Registry {
    pub fn new() -> Self {
        let mut handlers = HashMap::new();
        handlers.insert("acessos", Handler::Acessos);
        Self { handlers }
    }

    pub fn get(&self, event_type: &str) -> Option<Handler> {
        self.handlers.get(event_type).copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Route a normalized `(body, headers)` pair through auth, event-type lookup
/// and the matched handler.
pub async fn dispatch(
    registry: &Registry,
    forwarder: &Forwarder,
    body: &Map<String, Value>,
    headers: &Map<String, Value>,
) -> GatewayResponse {
    // API key first, before any body inspection
    let Some(api_key) = extract_api_key(headers) else {
        warn!("api_key_missing");
        return GatewayResponse::erro(StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED);
    };

    let event_type = body
        .get("event_type")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    let Some(event_type) = event_type else {
        warn!("event_type_missing");
        return GatewayResponse::erro(
            StatusCode::BAD_REQUEST,
            request_error("event_type é obrigatório."),
        );
    };

    match registry.get(event_type) {
        Some(Handler::Acessos) => acessos::handle(forwarder, body, api_key).await,
        None => {
            warn!(event_type = %event_type, "event_type_unknown");
            GatewayResponse::erro(
                StatusCode::BAD_REQUEST,
                request_error(&format!("event_type '{event_type}' não é válido.")),
            )
        }
    }
}

/// Case-insensitive-ish API key lookup: the canonical header name first,
/// then the lowercase form. Empty values count as absent.
fn extract_api_key(headers: &Map<String, Value>) -> Option<&str> {
    ["X-Api-Key", "x-api-key"].into_iter().find_map(|name| {
        headers
            .get(name)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
    })
}
