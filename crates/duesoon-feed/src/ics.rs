//! ICS/iCalendar parsing utilities.
//!
//! This module parses iCalendar (RFC 5545) data and converts every VEVENT
//! into a [`RawEvent`]. Other components (VTIMEZONE, VTODO, ...) are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use duesoon_core::time::start_of_day_utc;
use icalendar::parser::{Component, Property, read_calendar, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::{debug, trace};

use crate::error::{FeedError, FeedResult};
use crate::raw_event::{RawEvent, RawEventTime};

/// Parses ICS content and extracts events.
///
/// Entries without a usable DTSTART are skipped. The order of the returned
/// events is the order in which they appear in the document.
///
/// # Errors
///
/// Returns an invalid response error if the text is not a calendar document.
pub fn parse_ics_content(ics: &str) -> FeedResult<Vec<RawEvent>> {
    let ics = ics.trim_start_matches('\u{feff}');
    if !ics.trim_start().starts_with("BEGIN:VCALENDAR") {
        return Err(FeedError::invalid_response(
            "Response is not an iCalendar document",
        ));
    }

    let unfolded = unfold(ics);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| FeedError::invalid_response(format!("Failed to parse ICS content: {}", e)))?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    Ok(vevents.into_iter().filter_map(parse_event).collect())
}

/// Walks the component tree depth-first, keeping every VEVENT.
fn collect_vevents<'c, 'a>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        }
        collect_vevents(&component.components, out);
    }
}

/// Parses a single VEVENT component into a RawEvent.
fn parse_event(vevent: &Component<'_>) -> Option<RawEvent> {
    let uid = vevent.find_prop("UID").map(|p| p.val.to_string());

    let Some(dtstart) = vevent.find_prop("DTSTART") else {
        debug!(uid = ?uid, "Skipping event without DTSTART");
        return None;
    };
    let Some(start) = parse_date_property(dtstart) else {
        debug!(uid = ?uid, value = %dtstart.val, "Skipping event with unparseable DTSTART");
        return None;
    };

    let mut raw = RawEvent::new(start);
    raw.end = vevent.find_prop("DTEND").and_then(parse_date_property);
    raw.summary = text_property(vevent, "SUMMARY");
    raw.description = text_property(vevent, "DESCRIPTION");
    raw.location = text_property(vevent, "LOCATION");
    raw.url = vevent.find_prop("URL").map(|p| p.val.to_string());
    raw.uid = uid;
    raw.sequence = vevent.find_prop("SEQUENCE").map(|p| p.val.to_string());
    raw.status = vevent.find_prop("STATUS").map(|p| p.val.to_string());
    raw.created = timestamp_property(vevent, "CREATED");
    raw.last_modified = timestamp_property(vevent, "LAST-MODIFIED");
    raw.categories = vevent
        .find_prop("CATEGORIES")
        .map(|p| split_text_list(p.val.as_ref()))
        .unwrap_or_default();

    trace!(
        uid = ?raw.uid,
        summary = ?raw.summary,
        start = ?raw.start,
        "Parsed event from ICS"
    );

    Some(raw)
}

fn text_property(vevent: &Component<'_>, name: &str) -> Option<String> {
    vevent.find_prop(name).map(|p| unescape_text(p.val.as_ref()))
}

fn timestamp_property(vevent: &Component<'_>, name: &str) -> Option<DateTime<Utc>> {
    vevent
        .find_prop(name)
        .and_then(parse_date_property)
        .map(|time| match time {
            RawEventTime::DateTime(dt) => dt,
            RawEventTime::Date(date) => start_of_day_utc(date),
        })
}

/// Reads a date or date-time property, honouring its TZID parameter.
fn parse_date_property(prop: &Property<'_>) -> Option<RawEventTime> {
    match DatePerhapsTime::try_from(prop) {
        Ok(value) => Some(convert_date_time(value)),
        Err(_) => parse_icalendar_datetime(prop.val.as_ref()),
    }
}

/// Converts icalendar DatePerhapsTime to RawEventTime.
fn convert_date_time(dt: DatePerhapsTime) -> RawEventTime {
    match dt {
        DatePerhapsTime::Date(date) => RawEventTime::from_date(date),
        DatePerhapsTime::DateTime(cdt) => {
            let utc_dt = match cdt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
                CalendarDateTime::WithTimezone { date_time, tzid } => {
                    resolve_zoned(&date_time, &tzid)
                }
            };
            RawEventTime::from_datetime(utc_dt)
        }
    }
}

/// Resolves a wall-clock time in an IANA zone to UTC.
///
/// Unknown zones, and wall-clock times that do not exist in the zone, are
/// taken as UTC.
fn resolve_zoned(date_time: &NaiveDateTime, tzid: &str) -> DateTime<Utc> {
    let Ok(tz) = tzid.parse::<Tz>() else {
        debug!(tzid = %tzid, "Unknown TZID, assuming UTC");
        return Utc.from_utc_datetime(date_time);
    };

    tz.from_local_datetime(date_time)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(date_time))
}

/// Parses an iCalendar datetime string.
///
/// Handles formats like:
/// - 20250205T100000Z (UTC)
/// - 20250205T100000 (floating, taken as UTC)
/// - 20250205 (date only)
pub fn parse_icalendar_datetime(s: &str) -> Option<RawEventTime> {
    let s = s.trim();

    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        let date = NaiveDate::parse_from_str(s, "%Y%m%d").ok()?;
        return Some(RawEventTime::from_date(date));
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    let dt = NaiveDateTime::parse_from_str(naive, "%Y%m%dT%H%M%S").ok()?;
    Some(RawEventTime::from_datetime(Utc.from_utc_datetime(&dt)))
}

/// Splits a multi-valued TEXT property on unescaped commas and unescapes
/// each value.
pub fn split_text_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => items.push(unescape_text(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    items.push(unescape_text(&current));
    items
}

/// Reverses RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
