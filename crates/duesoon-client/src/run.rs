//! One fetch, compose, dispatch pass.

use chrono::{DateTime, Utc};
use duesoon_dispatch::{DispatchError, Dispatcher};
use duesoon_feed::FeedSource;
use duesoon_protocol::WebhookPayload;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    /// Events found in the window.
    pub event_count: usize,
    /// Blocks in the posted payload.
    pub block_count: usize,
    /// Whether the webhook accepted the payload.
    pub delivered: bool,
    /// Why delivery failed, if it did.
    pub error: Option<DispatchError>,
}

impl RunReport {
    /// Turns a failed delivery into an error.
    pub fn into_result(mut self) -> ClientResult<Self> {
        match self.error.take() {
            Some(e) => Err(ClientError::Dispatch(e)),
            None => Ok(self),
        }
    }
}

/// Builds the payload for the events of `source` as seen at `now`.
///
/// Feed failures are logged and produce the "nothing due" payload.
pub async fn build_payload_at(
    config: &AppConfig,
    source: &dyn FeedSource,
    now: DateTime<Utc>,
) -> (usize, WebhookPayload) {
    let events = duesoon_feed::collect_at(source, config.window_hours, now).await;
    let blocks = config.composer().compose_at(&events, config.window_hours, now);
    (events.len(), config.payload(blocks))
}

/// Fetches, composes and dispatches once, as seen at `now`.
///
/// Never fails: the delivery result is recorded in the report.
pub async fn run_once_at(
    config: &AppConfig,
    source: &dyn FeedSource,
    dispatcher: &dyn Dispatcher,
    now: DateTime<Utc>,
) -> RunReport {
    let (event_count, payload) = build_payload_at(config, source, now).await;
    let block_count = payload.block_count();

    match dispatcher.dispatch(&payload).await {
        Ok(()) => {
            info!(
                dispatcher = %dispatcher.name(),
                events = event_count,
                blocks = block_count,
                "Notification delivered"
            );
            RunReport {
                event_count,
                block_count,
                delivered: true,
                error: None,
            }
        }
        Err(e) => {
            warn!(
                dispatcher = %dispatcher.name(),
                status = e.status(),
                error = %e,
                "Notification delivery failed"
            );
            RunReport {
                event_count,
                block_count,
                delivered: false,
                error: Some(e),
            }
        }
    }
}

/// [`run_once_at`] using the current time.
pub async fn run_once(
    config: &AppConfig,
    source: &dyn FeedSource,
    dispatcher: &dyn Dispatcher,
) -> RunReport {
    run_once_at(config, source, dispatcher, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use duesoon_dispatch::RecordingDispatcher;
    use duesoon_feed::{ErrorFeed, FeedError, StaticFeed};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 8, 0, 0, 0).unwrap()
    }

    fn feed_with(events: &[(&str, &str)]) -> StaticFeed {
        let mut ics = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n");
        for (summary, start) in events {
            ics.push_str(&format!(
                "BEGIN:VEVENT\r\nUID:{start}\r\nSUMMARY:{summary}\r\nDTSTART:{start}\r\n\
                 CATEGORIES:CS101 Algorithms\r\nEND:VEVENT\r\n"
            ));
        }
        ics.push_str("END:VCALENDAR\r\n");
        StaticFeed::new("test", ics)
    }

    #[tokio::test]
    async fn delivers_header_and_event_blocks() {
        let feed = feed_with(&[
            ("課題「Report 1」の提出", "20250408T060000Z"),
            ("Quiz 3", "20250409T030000Z"),
            ("Too late", "20250412T000000Z"),
        ]);
        let dispatcher = RecordingDispatcher::new();

        let report = run_once_at(&AppConfig::default(), &feed, &dispatcher, now()).await;

        assert!(report.delivered);
        assert_eq!(report.event_count, 2);
        assert_eq!(report.block_count, 3);

        let delivered = dispatcher.delivered();
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0];
        assert_eq!(payload.username, "イベント通知Bot");
        assert_eq!(payload.embeds[1].title.as_deref(), Some("📖 Algorithms"));
        assert!(
            payload.embeds[1]
                .description
                .as_deref()
                .unwrap()
                .contains("Report 1")
        );
    }

    #[tokio::test]
    async fn feed_failure_still_notifies() {
        let feed = ErrorFeed::new("broken", FeedError::network("connection refused"));
        let dispatcher = RecordingDispatcher::new();

        let report = run_once_at(&AppConfig::default(), &feed, &dispatcher, now()).await;

        assert!(report.delivered);
        assert_eq!(report.event_count, 0);
        let payload = &dispatcher.delivered()[0];
        assert_eq!(payload.embeds.len(), 1);
        assert_eq!(
            payload.embeds[0].description.as_deref(),
            Some("48時間以内に予定されている課題はありません。")
        );
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let feed = feed_with(&[]);
        let dispatcher = RecordingDispatcher::failing(404);

        let report = run_once_at(&AppConfig::default(), &feed, &dispatcher, now()).await;

        assert!(!report.delivered);
        assert_eq!(report.error.as_ref().and_then(DispatchError::status), Some(404));
        assert!(matches!(
            report.into_result(),
            Err(ClientError::Dispatch(_))
        ));
    }

    #[tokio::test]
    async fn window_follows_config() {
        let feed = feed_with(&[("Later", "20250410T060000Z")]);
        let config = AppConfig {
            window_hours: 72,
            ..AppConfig::default()
        };

        let (count, payload) = build_payload_at(&config, &feed, now()).await;
        assert_eq!(count, 1);
        assert_eq!(payload.block_count(), 2);

        let (count, _) = build_payload_at(&AppConfig::default(), &feed, now()).await;
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let feed = feed_with(&[("Quiz 3", "20250409T030000Z")]);
        let config = AppConfig::default();

        let (_, first) = build_payload_at(&config, &feed, now()).await;
        let (_, second) = build_payload_at(&config, &feed, now()).await;
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}
