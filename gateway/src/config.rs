//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables, falling back to
//! defaults when a variable is missing or unparseable.

use std::env;

/// Default Navision webhook endpoint.
pub const DEFAULT_NAVISION_URL: &str =
    "https://xkit-1dzl-gome.n7c.xano.io/api:yXFPZvLr/webhook_acessos";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Navision webhook endpoint to forward validated events to
    pub navision_url: String,

    /// Maximum number of forwarding attempts per event (transport failures only)
    pub forward_max_attempts: u32,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            navision_url: env::var("NAVISION_URL")
                .unwrap_or_else(|_| DEFAULT_NAVISION_URL.to_string()),

            forward_max_attempts: env::var("FORWARD_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so parallel test threads never race on the env vars.
    #[test]
    fn test_from_env() {
        env::remove_var("PORT");
        env::remove_var("NAVISION_URL");
        env::remove_var("FORWARD_MAX_ATTEMPTS");
        env::remove_var("REQUEST_TIMEOUT_MS");

        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.navision_url, DEFAULT_NAVISION_URL);
        assert_eq!(config.forward_max_attempts, 3);
        assert_eq!(config.request_timeout_ms, 8000);

        // Unparseable values fall back to defaults
        env::set_var("FORWARD_MAX_ATTEMPTS", "many");
        assert_eq!(Config::from_env().forward_max_attempts, 3);
        env::remove_var("FORWARD_MAX_ATTEMPTS");

        env::set_var("NAVISION_URL", "http://localhost:9999/webhook");
        assert_eq!(Config::from_env().navision_url, "http://localhost:9999/webhook");
        env::remove_var("NAVISION_URL");
    }
}
