//! Navhook - webhook gateway for Navision access events.
//!
//! This library provides the modules behind the `navhook-web` binary, a thin
//! gateway that:
//! - Receives access-control ("acessos") webhook events
//! - Authenticates the caller via the `X-Api-Key` header
//! - Validates the event body shape
//! - Forwards a flattened payload to the Navision API, with bounded retry
//! - Translates Navision's body-encoded logical status code into the reply
//!
//! ## Architecture
//!
//! ```text
//! Raw event → event::read_event → dispatch → handlers::acessos → Forwarder → Navision
//! ```

pub mod config;
pub mod dispatch;
pub mod event;
pub mod forward;
pub mod handlers;
pub mod response;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{dispatch, Registry};
pub use forward::Forwarder;
pub use response::GatewayResponse;
pub use web::AppState;
