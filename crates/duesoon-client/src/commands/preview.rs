//! `duesoon preview`: print the payload instead of posting it.

use chrono::Utc;
use duesoon_feed::FeedClient;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::run::build_payload_at;

/// Fetches the feed, composes the notification and prints its JSON to stdout.
///
/// Needs no webhook URL.
pub async fn preview(config: &AppConfig) -> ClientResult<()> {
    let feed = FeedClient::new(config.feed_config()?)?;
    let (event_count, payload) = build_payload_at(config, &feed, Utc::now()).await;
    debug!(events = event_count, blocks = payload.block_count(), "Composed preview");

    println!("{}", payload.to_json_pretty()?);
    Ok(())
}
