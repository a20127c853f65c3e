//! Raw event data as read from the feed.
//!
//! A [`RawEvent`] keeps the feed's own shape: missing properties stay `None`
//! and date-only values stay dates. [`normalize_event`](crate::normalize_event)
//! turns it into a [`duesoon_core::Event`].

use chrono::{DateTime, NaiveDate, Utc};
use duesoon_core::NO_TITLE;
use serde::{Deserialize, Serialize};

/// The time specification for a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// A specific datetime, already resolved to UTC.
    DateTime(DateTime<Utc>),
    /// A date without a time component.
    Date(NaiveDate),
}

impl RawEventTime {
    /// Creates a RawEventTime from a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a RawEventTime from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Returns true if this is a date-only value.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// A VEVENT as found in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// DTSTART.
    pub start: RawEventTime,
    /// DTEND, if present.
    pub end: Option<RawEventTime>,
    /// SUMMARY.
    pub summary: Option<String>,
    /// DESCRIPTION.
    pub description: Option<String>,
    /// LOCATION.
    pub location: Option<String>,
    /// URL.
    pub url: Option<String>,
    /// UID.
    pub uid: Option<String>,
    /// SEQUENCE, verbatim.
    pub sequence: Option<String>,
    /// CREATED.
    pub created: Option<DateTime<Utc>>,
    /// LAST-MODIFIED.
    pub last_modified: Option<DateTime<Utc>>,
    /// STATUS, verbatim.
    pub status: Option<String>,
    /// Values of the first CATEGORIES property.
    pub categories: Vec<String>,
}

impl RawEvent {
    /// Creates a raw event with only a start time.
    pub fn new(start: RawEventTime) -> Self {
        Self {
            start,
            end: None,
            summary: None,
            description: None,
            location: None,
            url: None,
            uid: None,
            sequence: None,
            created: None,
            last_modified: None,
            status: None,
            categories: Vec::new(),
        }
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: RawEventTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the categories.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Returns the summary, or the placeholder title when there is none.
    pub fn effective_title(&self) -> &str {
        self.summary.as_deref().unwrap_or(NO_TITLE)
    }

    /// Returns the first category, if any.
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> RawEventTime {
        RawEventTime::from_datetime(Utc.with_ymd_and_hms(2025, 4, 10, 14, 59, 0).unwrap())
    }

    #[test]
    fn missing_summary_uses_placeholder() {
        let raw = RawEvent::new(start());
        assert_eq!(raw.effective_title(), "イベント名なし");

        let raw = raw.with_summary("Report");
        assert_eq!(raw.effective_title(), "Report");
    }

    #[test]
    fn first_category() {
        let raw = RawEvent::new(start());
        assert!(raw.first_category().is_none());

        let raw = raw.with_categories(vec!["CS101 Algorithms".into(), "Extra".into()]);
        assert_eq!(raw.first_category(), Some("CS101 Algorithms"));
    }

    #[test]
    fn date_values_are_all_day() {
        let date = RawEventTime::from_date(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
        assert!(date.is_all_day());
        assert!(!start().is_all_day());
    }
}
