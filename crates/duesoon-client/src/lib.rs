//! CLI, configuration loading, run/watch/preview entry points
//!
//! This crate provides the `duesoon` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod run;

pub use cli::Cli;
pub use config::{AppConfig, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use run::{RunReport, run_once, run_once_at};
