//! Time helpers for deadline events.
//!
//! This module provides [`TimeWindow`] for the forward-looking notification
//! window, the all-day normalization rules used by the feed normalizer, and
//! the Japanese deadline rendering used in notifications.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default window size in hours.
pub const DEFAULT_WINDOW_HOURS: u32 = 48;

/// Default timezone used to render deadlines.
pub const DEFAULT_DISPLAY_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

/// Single-character weekday names, Monday first.
const WEEKDAYS_JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// A forward-looking time window.
///
/// Represents a closed interval `[start, end]` in UTC. Both bounds are
/// inclusive: an event starting exactly at `start` or exactly at `end` is
/// inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (inclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window spanning `hours` hours from `now`.
    ///
    /// A window reaching past the last representable instant ends there.
    pub fn ahead(now: DateTime<Utc>, hours: u32) -> Self {
        let end = Duration::try_hours(i64::from(hours))
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start: now, end }
    }

    /// Returns true if `dt` falls inside the window.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt <= self.end
    }

    /// Returns the window length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Normalizes a date-only start value to midnight UTC.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Normalizes a date-only end value to the last representable instant of that day (UTC).
pub fn end_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    start_of_day_utc(date) + Duration::days(1) - Duration::microseconds(1)
}

/// Fractional hours from `now` until `target`. Negative when `target` is in the past.
pub fn hours_until(target: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = target - now;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 3_600_000_000.0,
        None => delta.num_seconds() as f64 / 3_600.0,
    }
}

/// Returns the single-character Japanese weekday for a date.
pub fn weekday_ja<D: Datelike>(date: &D) -> &'static str {
    WEEKDAYS_JA[date.weekday().num_days_from_monday() as usize]
}

/// Renders a deadline as `2025年4月8日(火) 15:00` in the given timezone.
pub fn format_deadline<Tz2: TimeZone>(dt: DateTime<Utc>, tz: &Tz2) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    let local = dt.with_timezone(tz);
    format!(
        "{}年{}月{}日({}) {}",
        local.year(),
        local.month(),
        local.day(),
        weekday_ja(&local),
        local.format("%H:%M")
    )
}

/// Renders the current time as `2025年04月08日 15:00` in the given timezone.
pub fn format_clock<Tz2: TimeZone>(dt: DateTime<Utc>, tz: &Tz2) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    dt.with_timezone(tz).format("%Y年%m月%d日 %H:%M").to_string()
}
