//! Delivery side of duesoon: webhook dispatch and scheduled runs.
//!
//! - [`Dispatcher`] - delivers a [`WebhookPayload`](duesoon_protocol::WebhookPayload)
//!   ([`WebhookDispatcher`] over HTTP, [`RecordingDispatcher`] in memory)
//! - [`Scheduler`] - repeats a run on a fixed interval for `watch` mode
//! - [`SignalHandler`] - turns Ctrl+C / SIGTERM into a shutdown signal
//!
//! # Example
//!
//! ```rust,no_run
//! use duesoon_dispatch::{DispatchConfig, Dispatcher, WebhookDispatcher};
//! use duesoon_protocol::WebhookPayload;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DispatchConfig::new("https://discord.com/api/webhooks/1/token")?;
//!     let dispatcher = WebhookDispatcher::new(config)?;
//!     dispatcher.dispatch(&WebhookPayload::default()).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatcher;
mod error;
mod scheduler;
mod signals;

pub use config::DispatchConfig;
pub use dispatcher::{BoxFuture, Dispatcher, RecordingDispatcher, WebhookDispatcher};
pub use error::{DispatchError, DispatchResult};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerState};
pub use signals::{ShutdownHandle, ShutdownSignal, SignalHandler};
