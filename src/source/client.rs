//! HTTP client for JSON record endpoints.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{Result, SourceError};
use super::parse_records;
use crate::entity::Record;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// Fetches record lists over HTTP.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    retry_delay_ms: u64,
}

impl SourceClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Network)?;
        Ok(Self {
            client,
            retry_delay_ms: RETRY_DELAY_MS,
        })
    }

    /// Fetch and parse the records at `url`.
    ///
    /// Network errors, 429 and 5xx responses are retried with exponential
    /// backoff.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<Record>> {
        info!("Fetching records");
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.fetch_once(url).await {
                Ok(records) => {
                    info!(count = records.len(), "Records fetched");
                    return Ok(records);
                }
                Err(e) if e.is_retryable() && attempts < MAX_RETRIES => {
                    let delay = self.retry_delay(attempts);
                    warn!(
                        "Request failed (attempt {}), retrying in {}ms: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<Record>> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let body = Self::handle_response(response).await?;
        parse_records(body)
    }

    /// Check the status and parse the body as JSON.
    async fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<Value>()
                .await
                .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", body);

            // Servers like the Rick and Morty API explain failures in an `error` field
            let context = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(url);
            Err(SourceError::from_status(status, &context))
        }
    }

    /// Exponential backoff for the given attempt (1-based).
    fn retry_delay(&self, attempt: u32) -> u64 {
        self.retry_delay_ms * 2u64.pow(attempt - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `responses` in order, one per connection, and return the base URL.
    async fn serve(responses: Vec<(u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/api/character", addr)
    }

    fn client() -> SourceClient {
        let mut client = SourceClient::new(Duration::from_secs(5)).unwrap();
        client.retry_delay_ms = 1;
        client
    }

    #[test]
    fn test_retry_delay_backoff() {
        let client = SourceClient::new(Duration::from_secs(1)).unwrap();
        assert_eq!(client.retry_delay(1), 1000);
        assert_eq!(client.retry_delay(2), 2000);
        assert_eq!(client.retry_delay(3), 4000);
    }

    #[tokio::test]
    async fn test_fetch_results_wrapper() {
        let url = serve(vec![(
            200,
            r#"{"info":{"count":2},"results":[{"id":1,"name":"Rick Sanchez"},{"id":2,"name":"Morty Smith"}]}"#,
        )])
        .await;

        let records = client().fetch(&url).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_str("name"), Some("Morty Smith"));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_not_retried() {
        let url = serve(vec![(404, r#"{"error":"There is nothing here"}"#)]).await;

        match client().fetch(&url).await {
            Err(SourceError::Status { status, context }) => {
                assert_eq!(status, 404);
                assert_eq!(context, "There is nothing here");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_retries_server_error() {
        let url = serve(vec![(503, "{}"), (200, r#"[{"id":1,"name":"Rick"}]"#)]).await;

        let records = client().fetch(&url).await.unwrap();
        assert_eq!(records.len(), 1);
    }
}
