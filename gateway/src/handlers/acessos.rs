//! Handler for "acessos" (access-control) events.
//!
//! Validates the event body field by field, short-circuiting on the first
//! violation, then forwards a flattened payload to Navision and maps its
//! logical status code to the outward reply.
//!
//! All checks are shape checks, matching the upstream contract exactly:
//! the UUID check accepts any hex value in every position (version and
//! variant bits are not inspected) and the date checks accept any digits
//! in the right places, with no calendar validity.

use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::warn;

use crate::forward::Forwarder;
use crate::response::{
    request_error, GatewayResponse, MSG_CONFLICT, MSG_INTERNAL_ERROR, MSG_UNAUTHORIZED,
};

/// Run the full acessos pipeline: validate, forward, map the result.
pub async fn handle(
    forwarder: &Forwarder,
    body: &Map<String, Value>,
    api_key: &str,
) -> GatewayResponse {
    if let Err(mensagem) = validate_body(body) {
        warn!(mensagem = %mensagem, "acessos_validation_failed");
        return GatewayResponse::erro(StatusCode::BAD_REQUEST, request_error(&mensagem));
    }

    // validate_body guarantees both fields are present and well-typed
    let event_id = body.get("event_id").and_then(Value::as_str).unwrap_or_default();
    let data = body
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let payload = flatten_payload(event_id, &data);
    let logical_code = forwarder.send(&payload, api_key).await;
    map_logical_code(logical_code)
}

/// Validate the acessos body, returning the first violation's message.
pub(crate) fn validate_body(body: &Map<String, Value>) -> Result<(), String> {
    let event_id = body.get("event_id").and_then(Value::as_str);
    if !event_id.is_some_and(is_uuid_shaped) {
        return Err("event_id deve ser um UUID válido.".into());
    }

    // An empty object is rejected the same as a missing one.
    let data = match body.get("data").and_then(Value::as_object) {
        Some(map) if !map.is_empty() => map,
        _ => return Err("data deve ser um objeto.".into()),
    };

    if !data.get("isps_code").is_some_and(Value::is_string) {
        return Err("isps_code deve ser uma string.".into());
    }

    if !data.get("nome_completo").is_some_and(Value::is_string) {
        return Err("nome_completo deve ser uma string.".into());
    }

    let tipo_acesso = data.get("tipo_acesso").and_then(Value::as_str);
    if !matches!(tipo_acesso, Some("VERMELHO") | Some("VERDE")) {
        return Err("tipo_acesso deve ser VERMELHO ou VERDE.".into());
    }

    let motivacao_inicio = data.get("motivacao_inicio").and_then(Value::as_str);
    if !motivacao_inicio.is_some_and(is_simple_date) {
        return Err("motivacao_inicio deve estar no formato yyyy-mm-dd.".into());
    }

    let motivacao_fim = data.get("motivacao_fim").and_then(Value::as_str);
    if !motivacao_fim.is_some_and(is_iso_datetime) {
        return Err(
            "motivacao_fim deve estar no formato ISO 8601 (ex: 2028-11-25T23:59:59-03:00).".into(),
        );
    }

    if !data.get("empresa").is_some_and(Value::is_string) {
        return Err("empresa deve ser uma string.".into());
    }

    if !data.get("id_foto").is_some_and(Value::is_i64) {
        return Err("id_foto deve ser um inteiro.".into());
    }

    if !data.get("gate").is_some_and(Value::is_i64) {
        return Err("gate deve ser um inteiro.".into());
    }

    Ok(())
}

/// Build the Navision payload: `event_id` plus every `data` field promoted
/// to the top level. No other body keys are carried over.
pub(crate) fn flatten_payload(event_id: &str, data: &Map<String, Value>) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("event_id".into(), Value::String(event_id.to_owned()));
    for (key, value) in data {
        payload.insert(key.clone(), value.clone());
    }
    payload
}

/// Map Navision's logical status code to the outward reply.
fn map_logical_code(code: Option<i64>) -> GatewayResponse {
    match code {
        None | Some(500) => {
            GatewayResponse::erro(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR)
        }
        Some(401) => GatewayResponse::erro(StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED),
        Some(409) => GatewayResponse::erro(StatusCode::CONFLICT, MSG_CONFLICT),
        Some(_) => GatewayResponse::sucesso(),
    }
}

/// Hex-shaped UUID: 8-4-4-4-12 hex digits.
fn is_uuid_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        8 | 13 | 18 | 23 => c == b'-',
        _ => c.is_ascii_hexdigit(),
    })
}

/// yyyy-mm-dd digit shape.
fn is_simple_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        4 | 7 => c == b'-',
        _ => c.is_ascii_digit(),
    })
}

/// ISO-8601 date-time with an explicit numeric UTC offset,
/// e.g. `2028-11-25T23:59:59-03:00`. The `Z` form is not accepted.
fn is_iso_datetime(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 25 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        4 | 7 => c == b'-',
        10 => c == b'T',
        13 | 16 | 22 => c == b':',
        19 => c == b'+' || c == b'-',
        _ => c.is_ascii_digit(),
    })
}
