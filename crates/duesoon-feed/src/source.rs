//! FeedSource trait definition.
//!
//! A [`FeedSource`] yields the raw text of a calendar document. The HTTP
//! [`FeedClient`](crate::FeedClient) is the production source; [`StaticFeed`]
//! serves a fixed document and [`ErrorFeed`] always fails, which lets the
//! rest of the pipeline run without a network.

use std::future::Future;
use std::pin::Pin;

use crate::error::{FeedError, FeedResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so sources can be passed
/// around as `&dyn FeedSource`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can produce the calendar document text.
pub trait FeedSource: Send + Sync {
    /// Returns a short label for logs (the URL for HTTP sources).
    fn name(&self) -> &str;

    /// Retrieves the whole calendar document.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` on transport failures or non-success responses.
    fn fetch(&self) -> BoxFuture<'_, FeedResult<String>>;
}

/// A source that always returns the same document.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    name: String,
    body: String,
}

impl StaticFeed {
    /// Creates a static source serving `body`.
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

impl FeedSource for StaticFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> BoxFuture<'_, FeedResult<String>> {
        let body = self.body.clone();
        Box::pin(async move { Ok(body) })
    }
}

/// A source that always fails.
#[derive(Debug)]
pub struct ErrorFeed {
    name: String,
    error: FeedError,
}

impl ErrorFeed {
    /// Creates a new failing source.
    pub fn new(name: impl Into<String>, error: FeedError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl FeedSource for ErrorFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> BoxFuture<'_, FeedResult<String>> {
        let error = FeedError::new(self.error.code(), self.error.message());
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedErrorCode;

    #[tokio::test]
    async fn static_feed_returns_body() {
        let feed = StaticFeed::new("fixture", "BEGIN:VCALENDAR");
        assert_eq!(feed.name(), "fixture");
        assert_eq!(feed.fetch().await.unwrap(), "BEGIN:VCALENDAR");
    }

    #[tokio::test]
    async fn error_feed_repeats_its_error() {
        let feed = ErrorFeed::new("broken", FeedError::network("connection refused"));
        for _ in 0..2 {
            let err = feed.fetch().await.unwrap_err();
            assert_eq!(err.code(), FeedErrorCode::NetworkError);
            assert_eq!(err.message(), "connection refused");
        }
    }
}
