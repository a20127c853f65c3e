//! RawEvent to Event conversion pipeline.
//!
//! The normalization process:
//! 1. Converts raw start/end values to UTC instants (date-only starts become
//!    midnight, date-only ends become the last microsecond of the day)
//! 2. Fills in the defaults for absent text fields
//! 3. Keeps events starting inside the window and sorts them by start time

use duesoon_core::time::{end_of_day_utc, start_of_day_utc};
use duesoon_core::{Event, TimeWindow};
use tracing::debug;

use crate::raw_event::{RawEvent, RawEventTime};

/// Converts a [`RawEvent`] to an [`Event`].
pub fn normalize_event(raw: &RawEvent) -> Event {
    Event {
        summary: raw.effective_title().to_string(),
        start_time: start_instant(raw.start),
        end_time: raw.end.map(end_instant),
        description: raw.description.clone().unwrap_or_default(),
        location: raw.location.clone().unwrap_or_default(),
        url: raw.url.clone().unwrap_or_default(),
        uid: raw.uid.clone().unwrap_or_default(),
        sequence: raw.sequence.clone().unwrap_or_else(|| "0".to_string()),
        created: raw.created,
        last_modified: raw.last_modified,
        status: raw.status.clone().unwrap_or_default(),
        category: raw.first_category().unwrap_or_default().to_string(),
        is_all_day: raw.start.is_all_day(),
    }
}

fn start_instant(time: RawEventTime) -> chrono::DateTime<chrono::Utc> {
    match time {
        RawEventTime::DateTime(dt) => dt,
        RawEventTime::Date(date) => start_of_day_utc(date),
    }
}

fn end_instant(time: RawEventTime) -> chrono::DateTime<chrono::Utc> {
    match time {
        RawEventTime::DateTime(dt) => dt,
        RawEventTime::Date(date) => end_of_day_utc(date),
    }
}

/// Normalizes raw events and keeps those starting inside `window`.
///
/// The result is sorted by start time. The sort is stable, so events with
/// the same start keep their feed order.
pub fn normalize_events(raw_events: &[RawEvent], window: &TimeWindow) -> Vec<Event> {
    let mut events: Vec<Event> = raw_events
        .iter()
        .map(normalize_event)
        .filter(|event| window.contains(event.start_time))
        .collect();

    events.sort_by_key(|event| event.start_time);

    debug!(
        total = raw_events.len(),
        kept = events.len(),
        window_start = %window.start,
        window_end = %window.end,
        "Filtered events to window"
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 8, 0, 0, 0).unwrap()
    }

    fn at(offset: Duration) -> RawEvent {
        RawEvent::new(RawEventTime::from_datetime(now() + offset))
    }

    mod basic_normalization {
        use super::*;

        #[test]
        fn fills_defaults() {
            let event = normalize_event(&at(Duration::hours(1)));

            assert_eq!(event.summary, "イベント名なし");
            assert_eq!(event.sequence, "0");
            assert_eq!(event.description, "");
            assert_eq!(event.location, "");
            assert_eq!(event.url, "");
            assert_eq!(event.uid, "");
            assert_eq!(event.status, "");
            assert_eq!(event.category, "");
            assert!(event.end_time.is_none());
            assert!(!event.is_all_day);
        }

        #[test]
        fn keeps_provided_fields() {
            let mut raw = at(Duration::hours(1))
                .with_summary("Quiz")
                .with_description("Chapters 1-3")
                .with_location("Room 101")
                .with_categories(vec!["STAT100 Statistics".into(), "Quiz".into()]);
            raw.sequence = Some("4".into());
            raw.status = Some("CONFIRMED".into());

            let event = normalize_event(&raw);
            assert_eq!(event.summary, "Quiz");
            assert_eq!(event.description, "Chapters 1-3");
            assert_eq!(event.location, "Room 101");
            assert_eq!(event.sequence, "4");
            assert_eq!(event.status, "CONFIRMED");
            assert_eq!(event.category, "STAT100 Statistics");
        }
    }

    mod all_day {
        use super::*;

        #[test]
        fn date_start_and_end() {
            let date = NaiveDate::from_ymd_opt(2025, 4, 9).unwrap();
            let raw = RawEvent::new(RawEventTime::from_date(date))
                .with_end(RawEventTime::from_date(date));

            let event = normalize_event(&raw);
            assert!(event.is_all_day);
            assert_eq!(event.start_time.to_rfc3339(), "2025-04-09T00:00:00+00:00");
            assert_eq!(
                event.end_time.unwrap().format("%H:%M:%S%.6f").to_string(),
                "23:59:59.999999"
            );
        }

        #[test]
        fn datetime_end_is_kept() {
            let end = now() + Duration::hours(2);
            let raw = at(Duration::hours(1)).with_end(RawEventTime::from_datetime(end));
            assert_eq!(normalize_event(&raw).end_time, Some(end));
        }
    }

    mod window_filter {
        use super::*;

        #[test]
        fn bounds_are_inclusive() {
            let window = TimeWindow::ahead(now(), 48);
            let raws = vec![
                at(Duration::seconds(-1)).with_summary("past"),
                at(Duration::zero()).with_summary("now"),
                at(Duration::hours(48)).with_summary("edge"),
                at(Duration::hours(48) + Duration::seconds(1)).with_summary("beyond"),
            ];

            let titles: Vec<_> = normalize_events(&raws, &window)
                .into_iter()
                .map(|e| e.summary)
                .collect();
            assert_eq!(titles, vec!["now", "edge"]);
        }

        #[test]
        fn sorted_by_start() {
            let window = TimeWindow::ahead(now(), 48);
            let raws = vec![
                at(Duration::hours(30)).with_summary("c"),
                at(Duration::hours(2)).with_summary("a"),
                at(Duration::hours(10)).with_summary("b"),
            ];

            let events = normalize_events(&raws, &window);
            let titles: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
            assert_eq!(titles, vec!["a", "b", "c"]);
            assert!(events.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        }

        #[test]
        fn ties_keep_feed_order() {
            let window = TimeWindow::ahead(now(), 48);
            let raws = vec![
                at(Duration::hours(5)).with_summary("first"),
                at(Duration::hours(1)).with_summary("earlier"),
                at(Duration::hours(5)).with_summary("second"),
            ];

            let titles: Vec<_> = normalize_events(&raws, &window)
                .into_iter()
                .map(|e| e.summary)
                .collect();
            assert_eq!(titles, vec!["earlier", "first", "second"]);
        }

        #[test]
        fn all_day_event_today_before_now_is_dropped() {
            // Midnight today is before 09:00 now.
            let now = now() + Duration::hours(9);
            let window = TimeWindow::ahead(now, 48);
            let raws = vec![RawEvent::new(RawEventTime::from_date(now.date_naive()))];
            assert!(normalize_events(&raws, &window).is_empty());
        }
    }
}
