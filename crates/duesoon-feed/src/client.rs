//! HTTP client for the calendar feed.

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace};

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::source::{BoxFuture, FeedSource};

/// Downloads the calendar document over HTTP.
pub struct FeedClient {
    client: Client,
    config: FeedConfig,
    label: String,
}

impl FeedClient {
    /// Creates a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FeedError::network(format!("Failed to create HTTP client: {}", e)))?;

        let label = config.redacted_url();
        Ok(Self {
            client,
            config,
            label,
        })
    }

    /// Performs a GET on the feed URL and returns the body as text.
    ///
    /// Bodies that are not valid UTF-8 are decoded lossily.
    pub async fn get(&self) -> FeedResult<String> {
        trace!(url = %self.label, "Sending request");

        let response = self
            .client
            .get(self.config.url.clone())
            .send()
            .await
            .map_err(|e| network_error("Request failed", e))?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> FeedResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        match status {
            s if s.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| network_error("Failed to read response", e))?;
                debug!(bytes = bytes.len(), "Downloaded feed");
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            StatusCode::NOT_FOUND => Err(FeedError::http_status(
                status.as_u16(),
                "Feed not found (is the export link still valid?)",
            )),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FeedError::http_status(
                status.as_u16(),
                "Access to the feed was denied (the export token may have expired)",
            )),
            s => Err(FeedError::http_status(
                s.as_u16(),
                format!("Unexpected status {}", s),
            )),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

/// Wraps a reqwest error without its URL, which carries the export token.
fn network_error(context: &str, e: reqwest::Error) -> FeedError {
    let e = e.without_url();
    FeedError::network(format!("{context}: {e}")).with_source(e)
}

impl FeedSource for FeedClient {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> BoxFuture<'_, FeedResult<String>> {
        Box::pin(self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedErrorCode;
    use crate::test_support::serve_once;
    use std::time::Duration;

    #[test]
    fn client_creation() {
        let config = FeedConfig::new("https://lms.example.edu/export.ics")
            .unwrap()
            .with_timeout(Duration::from_secs(10));
        let client = FeedClient::new(config).unwrap();
        assert_eq!(client.name(), "https://lms.example.edu/…");
    }

    #[tokio::test]
    async fn get_returns_body() {
        let url = serve_once("200 OK", b"BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").await;
        let client = FeedClient::new(FeedConfig::new(&url).unwrap()).unwrap();
        let body = client.get().await.unwrap();
        assert!(body.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn invalid_utf8_is_decoded_lossily() {
        let url = serve_once("200 OK", b"SUMMARY:caf\xe9\r\n").await;
        let client = FeedClient::new(FeedConfig::new(&url).unwrap()).unwrap();
        let body = client.get().await.unwrap();
        assert_eq!(body, "SUMMARY:caf\u{FFFD}\r\n");
    }

    #[tokio::test]
    async fn not_found_is_http_status_error() {
        let url = serve_once("404 Not Found", b"").await;
        let client = FeedClient::new(FeedConfig::new(&url).unwrap()).unwrap();
        let err = client.get().await.unwrap_err();
        assert_eq!(err.code(), FeedErrorCode::HttpStatus);
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn server_error_is_http_status_error() {
        let url = serve_once("503 Service Unavailable", b"busy").await;
        let client = FeedClient::new(FeedConfig::new(&url).unwrap()).unwrap();
        let err = client.get().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let config = FeedConfig::new("http://127.0.0.1:9/feed.ics")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let client = FeedClient::new(config).unwrap();
        let err = client.get().await.unwrap_err();
        assert_eq!(err.code(), FeedErrorCode::NetworkError);
    }

    #[tokio::test]
    async fn network_error_hides_export_token() {
        let config = FeedConfig::new("http://127.0.0.1:9/export_execute.php?authtoken=SECRET123")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let client = FeedClient::new(config).unwrap();

        assert!(!client.name().contains("SECRET123"));
        let err = client.get().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET123"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(!source.unwrap_or_default().contains("SECRET123"));
    }
}
