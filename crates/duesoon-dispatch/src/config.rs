//! Webhook dispatch configuration.

use std::time::Duration;
use url::Url;

use crate::error::{DispatchError, DispatchResult};

/// Webhook dispatch configuration.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// The webhook URL. The URL itself is the credential.
    pub webhook_url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl DispatchConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new dispatch configuration for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse or is not
    /// an `http`/`https` URL.
    pub fn new(webhook_url: impl AsRef<str>) -> DispatchResult<Self> {
        let parsed = Url::parse(webhook_url.as_ref())
            .map_err(|e| DispatchError::config(format!("invalid webhook URL: {}", e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DispatchError::config(format!(
                "unsupported webhook URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            webhook_url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("duesoon/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Builder: set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the webhook URL with its path and query removed, for logs.
    pub fn redacted_url(&self) -> String {
        let host = self.webhook_url.host_str().unwrap_or_default();
        match self.webhook_url.port() {
            Some(port) => format!("{}://{}:{}/…", self.webhook_url.scheme(), host, port),
            None => format!("{}://{}/…", self.webhook_url.scheme(), host),
        }
    }
}
