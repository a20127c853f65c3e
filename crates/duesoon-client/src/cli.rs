//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// duesoon - Calendar deadlines, posted to your chat before they are due
#[derive(Debug, Default, Parser)]
#[command(name = "duesoon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DUESOON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines (for scheduled deployments)
    #[arg(long, global = true)]
    pub json_logs: bool,

    // --- Feed flags ---
    /// Calendar feed (.ics export) URL
    #[arg(long, env = "DUESOON_FEED_URL", global = true)]
    pub feed_url: Option<String>,

    /// Report events starting within this many hours
    #[arg(long, env = "DUESOON_HOURS_AHEAD", global = true,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub hours: Option<u32>,

    // --- Webhook flags ---
    /// Webhook URL notifications are posted to
    #[arg(long, env = "DUESOON_WEBHOOK_URL", global = true, hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Display name of the posting bot
    #[arg(long, env = "DUESOON_USERNAME", global = true)]
    pub username: Option<String>,

    /// Avatar image URL of the posting bot
    #[arg(long, env = "DUESOON_AVATAR_URL", global = true)]
    pub avatar_url: Option<String>,

    // --- Display flags ---
    /// IANA timezone deadlines are rendered in
    #[arg(long, env = "DUESOON_TIMEZONE", global = true)]
    pub timezone: Option<String>,

    /// Footer text of the header block
    #[arg(long, global = true)]
    pub footer: Option<String>,

    /// Link to the course portal shown in the header block
    #[arg(long, env = "DUESOON_PORTAL_URL", global = true)]
    pub portal_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, compose and post the notification once (default)
    Run,

    /// Post the notification now and then on a fixed interval until interrupted
    Watch {
        /// Minutes between runs
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
        interval_minutes: u64,
    },

    /// Print the payload that would be posted, without posting it
    Preview,

    /// List the events in the window
    Events {
        /// Print the events as JSON
        #[arg(long)]
        json: bool,
    },

    /// Post a plain test message to the webhook
    TestWebhook,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
