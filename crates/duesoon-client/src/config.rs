//! Client configuration.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. command-line flags, or their `DUESOON_*` environment variables
//! 2. `config.toml`, at `~/.config/duesoon/config.toml` by default
//! 3. built-in defaults
//!
//! [`ClientConfig`] is the file as written on disk; [`AppConfig`] is the
//! merged result that every command receives.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use duesoon_core::compose::DEFAULT_FOOTER_TEXT;
use duesoon_core::{
    ComposeOptions, DEFAULT_DISPLAY_TIMEZONE, DEFAULT_WINDOW_HOURS, NotificationBlock,
    NotificationComposer, TracingConfig,
};
use duesoon_dispatch::DispatchConfig;
use duesoon_feed::FeedConfig;
use duesoon_protocol::{DEFAULT_USERNAME, WebhookPayload};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Default HTTP timeout in seconds, shared by the feed and webhook clients.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Feed settings.
    pub feed: FeedSettings,

    /// Webhook settings.
    pub webhook: WebhookSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// `[feed]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Calendar feed URL.
    pub url: Option<String>,

    /// Window size in hours.
    pub hours_ahead: u32,

    /// HTTP timeout in seconds.
    pub timeout: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: None,
            hours_ahead: DEFAULT_WINDOW_HOURS,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[webhook]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Webhook URL.
    pub url: Option<String>,

    /// Bot display name.
    pub username: Option<String>,

    /// Bot avatar URL.
    pub avatar_url: Option<String>,
}

/// `[display]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// IANA timezone name, e.g. `Asia/Tokyo`.
    pub timezone: Option<String>,

    /// Footer text of the header block.
    pub footer: Option<String>,

    /// Portal link shown in the header block.
    pub portal_url: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duesoon")
    }
}

// ---------------------------------------------------------------------------
// AppConfig (merged)
// ---------------------------------------------------------------------------

/// The effective configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Calendar feed URL. Required by every command that reads the feed.
    pub feed_url: Option<String>,
    /// Webhook URL. Required by `run`, `watch` and `test-webhook`.
    pub webhook_url: Option<String>,
    /// Window size in hours.
    pub window_hours: u32,
    /// Bot display name.
    pub username: String,
    /// Bot avatar URL.
    pub avatar_url: Option<String>,
    /// Timezone deadlines are rendered in.
    pub timezone: Tz,
    /// Footer text of the header block.
    pub footer: String,
    /// Portal link shown in the header block.
    pub portal_url: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Debug mode.
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            webhook_url: None,
            window_hours: DEFAULT_WINDOW_HOURS,
            username: DEFAULT_USERNAME.to_string(),
            avatar_url: None,
            timezone: DEFAULT_DISPLAY_TIMEZONE,
            footer: DEFAULT_FOOTER_TEXT.to_string(),
            portal_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Merges command-line values over the file configuration.
    ///
    /// Empty strings count as unset, so `DUESOON_AVATAR_URL=` clears nothing
    /// and falls through to the file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown timezone or a zero
    /// window size in the file.
    pub fn resolve(cli: &Cli, file: ClientConfig) -> ClientResult<Self> {
        let window_hours = cli.hours.unwrap_or(file.feed.hours_ahead);
        if window_hours == 0 {
            return Err(ClientError::config("hours_ahead must be at least 1"));
        }

        let timezone = match pick(&cli.timezone, file.display.timezone) {
            Some(name) => parse_timezone(&name)?,
            None => DEFAULT_DISPLAY_TIMEZONE,
        };

        let timeout_secs = cli.timeout.unwrap_or(file.feed.timeout);
        if timeout_secs == 0 {
            return Err(ClientError::config("timeout must be at least 1 second"));
        }

        Ok(Self {
            feed_url: pick(&cli.feed_url, file.feed.url),
            webhook_url: pick(&cli.webhook_url, file.webhook.url),
            window_hours,
            username: pick(&cli.username, file.webhook.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            avatar_url: pick(&cli.avatar_url, file.webhook.avatar_url),
            timezone,
            footer: pick(&cli.footer, file.display.footer)
                .unwrap_or_else(|| DEFAULT_FOOTER_TEXT.to_string()),
            portal_url: pick(&cli.portal_url, file.display.portal_url),
            timeout: Duration::from_secs(timeout_secs),
            debug: cli.debug || file.debug,
        })
    }

    /// Builds the feed client configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no feed URL is set or it is invalid.
    pub fn feed_config(&self) -> ClientResult<FeedConfig> {
        let url = self.feed_url.as_deref().ok_or_else(|| {
            ClientError::config(format!(
                "feed URL is not set. Pass --feed-url, set DUESOON_FEED_URL, or add to {}:\n  \
                 [feed]\n  \
                 url = \"https://lms.example.edu/calendar/export_execute.php?...\"",
                ClientConfig::default_path().display()
            ))
        })?;
        let config = FeedConfig::new(url).map_err(|e| ClientError::config(e.message()))?;
        Ok(config.with_timeout(self.timeout))
    }

    /// Builds the webhook client configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no webhook URL is set or it is invalid.
    pub fn dispatch_config(&self) -> ClientResult<DispatchConfig> {
        let url = self.webhook_url.as_deref().ok_or_else(|| {
            ClientError::config(
                "webhook URL is not set. Pass --webhook-url, set DUESOON_WEBHOOK_URL, \
                 or add url under [webhook] in config.toml",
            )
        })?;
        let config = DispatchConfig::new(url).map_err(|e| ClientError::config(e.to_string()))?;
        Ok(config.with_timeout(self.timeout))
    }

    /// Composer options derived from the display settings.
    pub fn compose_options(&self) -> ComposeOptions {
        let options = ComposeOptions::default()
            .with_timezone(self.timezone)
            .with_footer_text(&self.footer);
        match &self.portal_url {
            Some(url) => options.with_portal_url(url),
            None => options,
        }
    }

    /// A composer configured with [`Self::compose_options`].
    pub fn composer(&self) -> NotificationComposer {
        NotificationComposer::new(self.compose_options())
    }

    /// Wraps `embeds` with the configured sender identity.
    pub fn payload(&self, embeds: Vec<NotificationBlock>) -> WebhookPayload {
        WebhookPayload::new(embeds)
            .with_username(&self.username)
            .with_avatar_url(self.avatar_url.as_deref())
    }

    /// Logging preset for this run. `debug` comes from `--debug` or the file.
    pub fn tracing_config(&self, json_logs: bool) -> TracingConfig {
        match (self.debug, json_logs) {
            (true, true) => TracingConfig::scheduled().with_level(tracing::Level::DEBUG),
            (false, true) => TracingConfig::scheduled(),
            (true, false) => TracingConfig::cli_debug(),
            (false, false) => TracingConfig::default(),
        }
    }

    /// Returns the configuration in file form, with the feed and webhook URLs
    /// redacted.
    pub fn to_file_config(&self) -> ClientConfig {
        ClientConfig {
            debug: self.debug,
            feed: FeedSettings {
                url: self.feed_url.as_deref().map(redact_feed_url),
                hours_ahead: self.window_hours,
                timeout: self.timeout.as_secs(),
            },
            webhook: WebhookSettings {
                url: self.webhook_url.as_deref().map(redact_webhook_url),
                username: Some(self.username.clone()),
                avatar_url: self.avatar_url.clone(),
            },
            display: DisplaySettings {
                timezone: Some(self.timezone.name().to_string()),
                footer: Some(self.footer.clone()),
                portal_url: self.portal_url.clone(),
            },
        }
    }
}

/// Returns the first non-empty value, CLI first.
fn pick(cli: &Option<String>, file: Option<String>) -> Option<String> {
    cli.as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .or_else(|| file.filter(|v| !v.trim().is_empty()))
}

fn parse_timezone(name: &str) -> ClientResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| ClientError::config(format!("unknown timezone {name:?}: {e}")))
}

/// Feed export links carry a token in the query, so only scheme and host are shown.
fn redact_feed_url(url: &str) -> String {
    FeedConfig::new(url)
        .map(|config| config.redacted_url())
        .unwrap_or_else(|_| "<invalid>".to_string())
}

/// Webhook URLs embed their token, so only scheme and host are shown.
fn redact_webhook_url(url: &str) -> String {
    DispatchConfig::new(url)
        .map(|config| config.redacted_url())
        .unwrap_or_else(|_| "<invalid>".to_string())
}
