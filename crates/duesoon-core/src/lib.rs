//! Core types: events, time windows, deadline rendering, notification composition

pub mod block;
pub mod compose;
pub mod event;
pub mod time;
pub mod tracing;

pub use block::{BlockField, BlockFooter, NotificationBlock};
pub use compose::{
    ComposeOptions, NotificationComposer, UrgencyTier, ellipsis, subject_name, task_title,
};
pub use event::{Event, NO_TITLE};
pub use time::{
    DEFAULT_DISPLAY_TIMEZONE, DEFAULT_WINDOW_HOURS, TimeWindow, format_clock, format_deadline,
};
pub use self::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
