//! Event type produced by the feed normalizer.
//!
//! An [`Event`] is a fully normalized calendar entry: every time is a UTC
//! instant and every optional text field has already been defaulted to an
//! empty string, so downstream code never has to reason about feed quirks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a feed entry carries no SUMMARY.
pub const NO_TITLE: &str = "イベント名なし";

/// A normalized calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The raw event title; may embed a sub-title between「」markers.
    pub summary: String,
    /// When the event starts (the deadline for assignment feeds).
    pub start_time: DateTime<Utc>,
    /// When the event ends, if the feed provided an end.
    pub end_time: Option<DateTime<Utc>>,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Location, possibly empty.
    pub location: String,
    /// Reference URL, possibly empty.
    pub url: String,
    /// Feed-assigned identifier, possibly empty.
    pub uid: String,
    /// Revision counter as written in the feed.
    pub sequence: String,
    /// When the entry was created.
    pub created: Option<DateTime<Utc>>,
    /// When the entry was last modified.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entry status, possibly empty.
    pub status: String,
    /// First category value, possibly empty.
    pub category: String,
    /// Whether the entry started on a date without a time component.
    pub is_all_day: bool,
}

impl Event {
    /// Creates a new event with the given summary and start time.
    ///
    /// All other fields take their defaults.
    pub fn new(summary: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            summary: summary.into(),
            start_time,
            end_time: None,
            description: String::new(),
            location: String::new(),
            url: String::new(),
            uid: String::new(),
            sequence: "0".to_string(),
            created: None,
            last_modified: None,
            status: String::new(),
            category: String::new(),
            is_all_day: false,
        }
    }

    /// Returns true if the event starts within `[start, end]` (inclusive on both ends).
    pub fn starts_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.start_time && self.start_time <= end
    }

    /// Builder method to set the end time.
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder method to set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Builder method to set the sequence.
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder method to mark the event as all-day.
    pub fn with_all_day(mut self, is_all_day: bool) -> Self {
        self.is_all_day = is_all_day;
        self
    }
}
