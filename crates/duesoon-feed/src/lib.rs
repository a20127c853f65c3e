//! Calendar feed retrieval and event normalization.
//!
//! This crate turns a remote iCalendar feed into the sorted list of
//! [`Event`]s that start inside the notification window:
//!
//! - [`FeedSource`] - Where the calendar text comes from ([`FeedClient`] over HTTP)
//! - [`parse_ics_content`] - ICS text to [`RawEvent`]s
//! - [`normalize_events`] - [`RawEvent`]s to windowed, sorted [`Event`]s
//! - [`FeedError`] - Error types for retrieval
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   .ics export   │
//! └────────┬────────┘
//!          │  FeedSource::fetch()
//!          ▼
//!   ┌─────────────┐
//!   │  ICS text   │
//!   └──────┬──────┘
//!          │  parse_ics_content()
//!          ▼
//!   ┌─────────────┐
//!   │  RawEvent   │
//!   └──────┬──────┘
//!          │  normalize_events(window)
//!          ▼
//!   ┌─────────────┐
//!   │    Event    │
//!   └─────────────┘
//! ```
//!
//! # Failure handling
//!
//! [`fetch_and_filter`] never fails: any retrieval or parse error is logged
//! at `warn` and an empty list is returned, so a broken feed produces a
//! "nothing due" notification instead of no notification at all. Use
//! [`try_fetch_and_filter`] to see the error.
//!
//! # Example
//!
//! ```ignore
//! use duesoon_feed::{FeedConfig, fetch_and_filter};
//!
//! let config = FeedConfig::new("https://lms.example.edu/calendar/export.ics?token=...")?;
//! let events = fetch_and_filter(&config, 48).await;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ics;
pub mod normalize;
pub mod raw_event;
pub mod source;

use chrono::{DateTime, Utc};
use duesoon_core::{Event, TimeWindow};
use tracing::{info, warn};

pub use client::FeedClient;
pub use config::FeedConfig;
pub use error::{FeedError, FeedErrorCode, FeedResult};
pub use ics::parse_ics_content;
pub use normalize::{normalize_event, normalize_events};
pub use raw_event::{RawEvent, RawEventTime};
pub use source::{BoxFuture, ErrorFeed, FeedSource, StaticFeed};

/// Parses calendar text and returns the events starting within
/// `window_hours` of `now`, sorted by start time.
pub fn parse_and_filter(ics: &str, window_hours: u32, now: DateTime<Utc>) -> FeedResult<Vec<Event>> {
    let raw_events = parse_ics_content(ics)?;
    let window = TimeWindow::ahead(now, window_hours);
    Ok(normalize_events(&raw_events, &window))
}

/// Reads `source` and returns the events in the window starting at `now`.
pub async fn try_collect_at(
    source: &dyn FeedSource,
    window_hours: u32,
    now: DateTime<Utc>,
) -> FeedResult<Vec<Event>> {
    let body = source.fetch().await?;
    let events = parse_and_filter(&body, window_hours, now)?;
    info!(
        source = %source.name(),
        window_hours,
        events = events.len(),
        "Collected upcoming events"
    );
    Ok(events)
}

/// Fail-soft form of [`try_collect_at`]: errors are logged and yield an
/// empty list.
pub async fn collect_at(source: &dyn FeedSource, window_hours: u32, now: DateTime<Utc>) -> Vec<Event> {
    match try_collect_at(source, window_hours, now).await {
        Ok(events) => events,
        Err(e) => {
            warn!(
                source = %source.name(),
                code = %e.code(),
                error = %e,
                "Feed retrieval failed, continuing with no events"
            );
            Vec::new()
        }
    }
}

/// Fetches the feed over HTTP and returns the events in the window starting
/// at `now`.
pub async fn try_fetch_and_filter_at(
    config: &FeedConfig,
    window_hours: u32,
    now: DateTime<Utc>,
) -> FeedResult<Vec<Event>> {
    let client = FeedClient::new(config.clone())?;
    try_collect_at(&client, window_hours, now).await
}

/// Fetches the feed over HTTP and returns the events starting within the
/// next `window_hours` hours.
pub async fn try_fetch_and_filter(config: &FeedConfig, window_hours: u32) -> FeedResult<Vec<Event>> {
    try_fetch_and_filter_at(config, window_hours, Utc::now()).await
}

/// Fail-soft form of [`try_fetch_and_filter_at`].
pub async fn fetch_and_filter_at(config: &FeedConfig, window_hours: u32, now: DateTime<Utc>) -> Vec<Event> {
    match try_fetch_and_filter_at(config, window_hours, now).await {
        Ok(events) => events,
        Err(e) => {
            warn!(
                url = %config.redacted_url(),
                code = %e.code(),
                error = %e,
                "Feed retrieval failed, continuing with no events"
            );
            Vec::new()
        }
    }
}

/// Fetches the feed and returns the events starting within the next
/// `window_hours` hours. Never fails; see the crate docs.
pub async fn fetch_and_filter(config: &FeedConfig, window_hours: u32) -> Vec<Event> {
    fetch_and_filter_at(config, window_hours, Utc::now()).await
}
