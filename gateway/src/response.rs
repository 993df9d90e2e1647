//! Outward-facing response types.
//!
//! Every reply carries `Content-Type: application/json` and a body of either
//! `{"status":"sucesso"}` or `{"status":"erro","mensagem":"<text>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned when the API key is missing or Navision rejects it.
pub const MSG_UNAUTHORIZED: &str = "Chave de API não autorizada.";

/// Message returned for transport exhaustion and any internal fault.
pub const MSG_INTERNAL_ERROR: &str = "Erro interno do servidor.";

/// Message returned when Navision reports the event as already registered.
pub const MSG_CONFLICT: &str = "Conflito — evento já registrado.";

/// Prefix a validation detail into the request-error message format.
pub fn request_error(detail: &str) -> String {
    format!("Erro de requisição — {detail}")
}

/// JSON body of a gateway reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

/// A complete gateway reply: HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status_code: StatusCode,
    pub body: ResponseBody,
}

impl GatewayResponse {
    /// Build the success reply (200, `{"status":"sucesso"}`).
    pub fn sucesso() -> Self {
        Self {
            status_code: StatusCode::OK,
            body: ResponseBody {
                status: "sucesso",
                mensagem: None,
            },
        }
    }

    /// Build an error reply with the given status and message.
    pub fn erro(status_code: StatusCode, mensagem: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                status: "erro",
                mensagem: Some(mensagem.into()),
            },
        }
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}
