//! Feed retrieval configuration.

use std::time::Duration;
use url::Url;

use crate::error::{FeedError, FeedResult};

/// Configuration for fetching the calendar feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// The feed URL (an `.ics` export link).
    pub url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl FeedConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new feed configuration with the given URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse or is not
    /// an `http`/`https` URL.
    pub fn new(url: impl AsRef<str>) -> FeedResult<Self> {
        let raw = url.as_ref();
        let parsed = Url::parse(raw).map_err(|e| {
            FeedError::configuration(format!("invalid feed URL: {e}")).with_source(e)
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FeedError::configuration(format!(
                "unsupported feed URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("duesoon/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the feed URL as a string.
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the feed URL with its path and query removed, for logs.
    ///
    /// Export links carry an access token in the query string.
    pub fn redacted_url(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}://{}:{}/…", self.url.scheme(), host, port),
            None => format!("{}://{}/…", self.url.scheme(), host),
        }
    }
}
