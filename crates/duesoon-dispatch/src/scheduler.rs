//! Fixed-interval scheduler for repeated runs.
//!
//! Runs a job immediately and then once per interval until shutdown is
//! signalled. Each run is independent: a failure is logged and the next run
//! happens on schedule, with no backoff and no retry.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::signals::ShutdownSignal;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between the starts of two runs.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
        }
    }
}

impl SchedulerConfig {
    /// Creates a new scheduler config with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Creates a config from an interval in minutes.
    pub fn every_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }
}

/// Counters kept across runs, for logging.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    /// Runs started.
    pub runs: u64,
    /// Runs that failed.
    pub failures: u64,
    /// Failures since the last success.
    pub consecutive_failures: u32,
    /// Last successful run.
    pub last_success: Option<DateTime<Utc>>,
    /// Last error message.
    pub last_error: Option<String>,
}

impl SchedulerState {
    /// Creates a new scheduler state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful run.
    pub fn record_success(&mut self) {
        self.runs += 1;
        self.consecutive_failures = 0;
        self.last_success = Some(Utc::now());
        self.last_error = None;
    }

    /// Records a failed run.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.runs += 1;
        self.failures += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(error.into());
    }
}

/// Runs a job on a fixed interval.
pub struct Scheduler {
    config: SchedulerConfig,
    state: SchedulerState,
}

impl Scheduler {
    /// Creates a new scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: SchedulerState::new(),
        }
    }

    /// Returns the state so far.
    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Runs `job` now and then every interval until `shutdown` fires.
    ///
    /// A run in progress is allowed to finish before the loop exits. Shutdown
    /// wins over a tick that is due at the same moment.
    /// Returns the final state.
    pub async fn run<F, Fut>(mut self, shutdown: ShutdownSignal, mut job: F) -> SchedulerState
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        info!(
            interval_secs = self.config.interval.as_secs(),
            "Scheduler started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = shutdown.wait();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!(runs = self.state.runs, failures = self.state.failures, "Scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    debug!(run = self.state.runs + 1, "Starting scheduled run");
                    match job().await {
                        Ok(()) => self.state.record_success(),
                        Err(e) => {
                            warn!(
                                error = %e,
                                consecutive_failures = self.state.consecutive_failures + 1,
                                "Scheduled run failed"
                            );
                            self.state.record_failure(e);
                        }
                    }
                }
            }
        }

        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalHandler;

    #[test]
    fn config_from_minutes() {
        let config = SchedulerConfig::every_minutes(30);
        assert_eq!(config.interval, Duration::from_secs(1800));
        assert_eq!(SchedulerConfig::default().interval, Duration::from_secs(3600));
    }

    #[test]
    fn state_tracking() {
        let mut state = SchedulerState::new();
        state.record_failure("boom");
        state.record_failure("boom again");
        assert_eq!(state.consecutive_failures, 2);
        assert_eq!(state.last_error.as_deref(), Some("boom again"));

        state.record_success();
        assert_eq!(state.runs, 3);
        assert_eq!(state.failures, 2);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_success.is_some());
        assert!(state.last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_every_interval() {
        let handler = SignalHandler::new();
        let handle = handler.shutdown_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(150)).await;
            handle.trigger();
        });

        let mut calls = 0u32;
        let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(60)));
        let state = scheduler
            .run(handler.shutdown(), || {
                calls += 1;
                async { Ok(()) }
            })
            .await;

        // t = 0, 60, 120
        assert_eq!(calls, 3);
        assert_eq!(state.runs, 3);
        assert_eq!(state.failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_loop() {
        let handler = SignalHandler::new();
        let handle = handler.shutdown_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(100)).await;
            handle.trigger();
        });

        let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(30)));
        let state = scheduler
            .run(handler.shutdown(), || async { Err("feed down".to_string()) })
            .await;

        // t = 0, 30, 60, 90
        assert_eq!(state.runs, 4);
        assert_eq!(state.failures, 4);
        assert_eq!(state.consecutive_failures, 4);
    }

    #[tokio::test]
    async fn already_signalled_shutdown_runs_nothing() {
        let handler = SignalHandler::new();
        handler.trigger_shutdown();

        let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(60)));
        let state = scheduler
            .run(handler.shutdown(), || async { Ok(()) })
            .await;
        assert_eq!(state.runs, 0);
    }
}
