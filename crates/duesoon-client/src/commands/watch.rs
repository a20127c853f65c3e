//! `duesoon watch`: post on a fixed interval until interrupted.

use std::time::Duration;

use duesoon_dispatch::{
    Dispatcher, Scheduler, SchedulerConfig, SchedulerState, ShutdownSignal, SignalHandler,
    WebhookDispatcher,
};
use duesoon_feed::{FeedClient, FeedSource};
use tracing::info;

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::run::run_once;

/// Runs until Ctrl+C or SIGTERM, posting every `interval_minutes`.
pub async fn watch(config: &AppConfig, interval_minutes: u64) -> ClientResult<SchedulerState> {
    let feed = FeedClient::new(config.feed_config()?)?;
    let dispatcher = WebhookDispatcher::new(config.dispatch_config()?)?;

    let signals = SignalHandler::new();
    signals.spawn_listener();

    let interval = Duration::from_secs(interval_minutes.saturating_mul(60));
    let state = watch_with(config, &feed, &dispatcher, interval, signals.shutdown()).await;

    info!(
        runs = state.runs,
        failures = state.failures,
        "Watch finished"
    );
    Ok(state)
}

/// Runs [`run_once`] against the given source and dispatcher until
/// `shutdown` fires. Each run is independent; a failed run does not stop
/// the loop.
pub async fn watch_with(
    config: &AppConfig,
    source: &dyn FeedSource,
    dispatcher: &dyn Dispatcher,
    interval: Duration,
    shutdown: ShutdownSignal,
) -> SchedulerState {
    Scheduler::new(SchedulerConfig::new(interval))
        .run(shutdown, || tick(config, source, dispatcher))
        .await
}

async fn tick(
    config: &AppConfig,
    source: &dyn FeedSource,
    dispatcher: &dyn Dispatcher,
) -> Result<(), String> {
    run_once(config, source, dispatcher)
        .await
        .into_result()
        .map(|_| ())
        .map_err(|e| e.to_string())
}
