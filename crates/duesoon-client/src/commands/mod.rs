//! Subcommand implementations.

pub mod config;
pub mod events;
pub mod preview;
pub mod run;
pub mod watch;
pub mod webhook;
