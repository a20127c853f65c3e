//! `duesoon events`: list the events in the window.

use std::fmt::Write;

use chrono_tz::Tz;
use duesoon_core::{Event, format_deadline};
use duesoon_feed::try_fetch_and_filter;

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};

const SEPARATOR_WIDTH: usize = 50;

/// Fetches the feed and prints the normalized events.
///
/// Unlike `run`, a feed failure is an error here.
pub async fn events(config: &AppConfig, json: bool) -> ClientResult<()> {
    let events = try_fetch_and_filter(&config.feed_config()?, config.window_hours).await?;

    if json {
        let text = serde_json::to_string_pretty(&events)
            .map_err(|e| ClientError::Encode(e.to_string()))?;
        println!("{text}");
    } else {
        print!("{}", render(&events, config.window_hours, &config.timezone));
    }
    Ok(())
}

/// Renders events as a human-readable listing.
pub fn render(events: &[Event], window_hours: u32, tz: &Tz) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {window_hours}時間以内のイベント: {}件 ===", events.len());

    if events.is_empty() {
        let _ = writeln!(out, "指定期間内のイベントはありません。");
        return out;
    }

    for (i, event) in events.iter().enumerate() {
        let _ = writeln!(out, "\n[イベント {}]", i + 1);
        let _ = writeln!(out, "タイトル: {}", event.summary);
        let _ = writeln!(out, "開始時刻: {}", format_deadline(event.start_time, tz));
        if let Some(end) = event.end_time {
            let _ = writeln!(out, "終了時刻: {}", format_deadline(end, tz));
        }
        if event.is_all_day {
            let _ = writeln!(out, "※ 終日イベント");
        }
        for (label, value) in [
            ("説明", &event.description),
            ("場所", &event.location),
            ("URL", &event.url),
            ("カテゴリ", &event.category),
            ("ステータス", &event.status),
        ] {
            if !value.is_empty() {
                let _ = writeln!(out, "{label}: {value}");
            }
        }
        if !event.uid.is_empty() {
            let _ = writeln!(out, "イベントID: {}", event.uid);
        }
        let _ = writeln!(out, "更新回数: {}", event.sequence);
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use duesoon_core::DEFAULT_DISPLAY_TIMEZONE;

    #[test]
    fn empty_listing() {
        let text = render(&[], 48, &DEFAULT_DISPLAY_TIMEZONE);
        assert_eq!(
            text,
            "=== 48時間以内のイベント: 0件 ===\n指定期間内のイベントはありません。\n"
        );
    }

    #[test]
    fn lists_present_fields_only() {
        let start = Utc.with_ymd_and_hms(2025, 4, 8, 6, 0, 0).unwrap();
        let events = vec![
            Event::new("Quiz 3", start)
                .with_category("STAT200 Statistics")
                .with_uid("42@lms")
                .with_sequence("2"),
        ];

        let text = render(&events, 24, &DEFAULT_DISPLAY_TIMEZONE);

        assert!(text.starts_with("=== 24時間以内のイベント: 1件 ===\n"));
        assert!(text.contains("[イベント 1]\nタイトル: Quiz 3\n開始時刻: 2025年4月8日(火) 15:00\n"));
        assert!(text.contains("カテゴリ: STAT200 Statistics\n"));
        assert!(text.contains("イベントID: 42@lms\n更新回数: 2\n"));
        assert!(!text.contains("場所"));
        assert!(!text.contains("終了時刻"));
        assert!(!text.contains("終日"));
    }

    #[test]
    fn all_day_events_are_marked() {
        let start = Utc.with_ymd_and_hms(2025, 4, 9, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 4, 9, 23, 59, 59).unwrap();
        let events = vec![
            Event::new("Holiday", start)
                .with_end_time(end)
                .with_all_day(true),
        ];

        let text = render(&events, 48, &chrono_tz::UTC);
        assert!(text.contains("終了時刻: 2025年4月9日(水) 23:59\n※ 終日イベント\n"));
    }
}
