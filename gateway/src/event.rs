//! Entry adapter: normalizes heterogeneous event representations.
//!
//! Callers deliver events in several shapes:
//! - a JSON-encoded string of the whole event
//! - an object with `body` / `headers` fields (the body itself possibly a
//!   JSON-encoded string)
//! - an object that IS the body, with no envelope at all
//!
//! `read_event` reduces all of them to a canonical `(body, headers)` pair.
//! Unparseable or non-object input degrades to empty maps; the dispatcher
//! then rejects the request with its normal missing-field responses.

use serde_json::{Map, Value};
use tracing::warn;

/// Normalize a raw event into a `(body, headers)` pair of JSON object maps.
pub fn read_event(event: &Value) -> (Map<String, Value>, Map<String, Value>) {
    let envelope = match event {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("event_decoded_to_non_object");
                return (Map::new(), Map::new());
            }
            Err(error) => {
                warn!(error = %error, "event_json_decode_failed");
                return (Map::new(), Map::new());
            }
        },
        Value::Object(map) => map.clone(),
        _ => {
            warn!("event_not_object_or_json_string");
            return (Map::new(), Map::new());
        }
    };

    let headers = envelope
        .get("headers")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    // A falsy body (absent, null, {}, "", 0, false) means the envelope
    // itself is the body.
    let mut body = envelope.get("body").cloned().unwrap_or(Value::Null);
    if is_falsy(&body) {
        body = Value::Object(envelope);
    }

    // The body may arrive as a JSON-encoded string (API Gateway style).
    if let Value::String(raw) = &body {
        body = match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(error = %error, "body_json_decode_failed");
                return (Map::new(), Map::new());
            }
        };
    }

    let body = body.as_object().cloned().unwrap_or_default();
    (body, headers)
}

/// Falsiness for JSON values: null, false, 0, "", [] and {} are all falsy.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_body_and_headers() {
        let event = json!({
            "body": {"event_type": "acessos"},
            "headers": {"X-Api-Key": "secret"},
        });

        let (body, headers) = read_event(&event);

        assert_eq!(body.get("event_type"), Some(&json!("acessos")));
        assert_eq!(headers.get("X-Api-Key"), Some(&json!("secret")));
    }

    #[test]
    fn test_string_encoded_event() {
        let event = json!(r#"{"body": {"event_type": "acessos"}, "headers": {"x-api-key": "k"}}"#);

        let (body, headers) = read_event(&event);

        assert_eq!(body.get("event_type"), Some(&json!("acessos")));
        assert_eq!(headers.get("x-api-key"), Some(&json!("k")));
    }

    #[test]
    fn test_string_encoded_body_inside_envelope() {
        let event = json!({
            "body": r#"{"event_type": "acessos"}"#,
            "headers": {},
        });

        let (body, _headers) = read_event(&event);

        assert_eq!(body.get("event_type"), Some(&json!("acessos")));
    }

    #[test]
    fn test_missing_body_falls_back_to_whole_event() {
        let event = json!({"event_type": "acessos", "event_id": "x"});

        let (body, headers) = read_event(&event);

        assert_eq!(body.get("event_type"), Some(&json!("acessos")));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_falsy_body_falls_back_to_whole_event() {
        for falsy in [json!(null), json!({}), json!(""), json!(0), json!(false)] {
            let event = json!({"body": falsy, "event_type": "acessos"});
            let (body, _) = read_event(&event);
            assert_eq!(body.get("event_type"), Some(&json!("acessos")));
        }
    }

    #[test]
    fn test_invalid_json_string_yields_empty() {
        let (body, headers) = read_event(&json!("not json at all {"));
        assert!(body.is_empty());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_body_string_yields_empty() {
        let event = json!({"body": "{broken", "headers": {"X-Api-Key": "k"}});
        let (body, headers) = read_event(&event);
        assert!(body.is_empty());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_non_object_event_yields_empty() {
        for event in [json!(42), json!(true), json!([1, 2, 3])] {
            let (body, headers) = read_event(&event);
            assert!(body.is_empty());
            assert!(headers.is_empty());
        }
    }
}
