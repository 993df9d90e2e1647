//! Outbound forwarding to the Navision API.
//!
//! Navision's contract has a quirk: the logical status code of the operation
//! is returned as the text of the HTTP response body, independent of the
//! transport-level HTTP status. An attempt therefore only completes once the
//! body has been read and parsed as an integer; transport errors and
//! non-integer bodies both count as failed attempts and are retried, up to
//! `max_attempts` total, with no backoff.

use reqwest::{header, Client};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

/// A single forwarding attempt failure.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not an integer logical code: {0:?}")]
    BadLogicalCode(String),
}

/// Forwards validated payloads to the Navision endpoint.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    url: String,
    max_attempts: u32,
}

impl Forwarder {
    pub fn new(client: Client, url: String, max_attempts: u32) -> Self {
        Self {
            client,
            url,
            max_attempts,
        }
    }

    /// POST the payload to Navision and return its logical status code.
    ///
    /// Returns `None` once all attempts are exhausted without a parseable
    /// logical code.
    pub async fn send(&self, payload: &Map<String, Value>, api_key: &str) -> Option<i64> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(payload, api_key).await {
                Ok(code) => {
                    info!(attempt, logical_code = code, "forward_complete");
                    return Some(code);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "forward_attempt_failed"
                    );
                }
            }
        }

        error!(max_attempts = self.max_attempts, "forward_attempts_exhausted");
        None
    }

    async fn attempt(
        &self,
        payload: &Map<String, Value>,
        api_key: &str,
    ) -> Result<i64, AttemptError> {
        let response = self
            .client
            .post(&self.url)
            .header(header::ACCEPT_ENCODING, "gzip, deflate")
            .header("X-Api-Key", api_key)
            .json(payload)
            .send()
            .await?;

        let text = response.text().await?;
        text.trim()
            .parse()
            .map_err(|_| AttemptError::BadLogicalCode(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Stub HTTP server returning a fixed body to every request.
    async fn spawn_stub(body: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = stream.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        addr
    }

    /// Stub server that drops every connection, counting accepts.
    async fn spawn_refusing_stub(counter: Arc<AtomicUsize>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });
        addr
    }

    fn payload() -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("event_id".into(), Value::String("abc".into()));
        payload
    }

    #[tokio::test]
    async fn test_send_parses_logical_code_from_body() {
        let addr = spawn_stub("409").await;
        let forwarder = Forwarder::new(Client::new(), format!("http://{addr}/webhook"), 3);

        let code = forwarder.send(&payload(), "key").await;

        assert_eq!(code, Some(409));
    }

    #[tokio::test]
    async fn test_send_retries_then_gives_up() {
        let counter = Arc::new(AtomicUsize::new(0));
        let addr = spawn_refusing_stub(counter.clone()).await;
        let forwarder = Forwarder::new(Client::new(), format!("http://{addr}/webhook"), 3);

        let code = forwarder.send(&payload(), "key").await;

        assert_eq!(code, None);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_send_non_integer_body_counts_as_failure() {
        let addr = spawn_stub("not a code").await;
        let forwarder = Forwarder::new(Client::new(), format!("http://{addr}/webhook"), 2);

        let code = forwarder.send(&payload(), "key").await;

        assert_eq!(code, None);
    }
}
