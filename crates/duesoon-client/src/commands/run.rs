//! `duesoon run`: post the notification once.

use duesoon_dispatch::WebhookDispatcher;
use duesoon_feed::FeedClient;

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::run::{RunReport, run_once};

/// Fetches the feed, composes the notification and posts it.
///
/// Feed failures still post the "nothing due" notification; a rejected or
/// failed post is returned as an error.
pub async fn run(config: &AppConfig) -> ClientResult<RunReport> {
    let feed = FeedClient::new(config.feed_config()?)?;
    let dispatcher = WebhookDispatcher::new(config.dispatch_config()?)?;

    run_once(config, &feed, &dispatcher).await.into_result()
}
