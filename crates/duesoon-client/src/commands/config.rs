//! Configuration commands.

use std::path::Path;

use crate::config::{AppConfig, ClientConfig};
use crate::error::ClientResult;

/// Dump the effective configuration to stdout, webhook URL redacted.
pub fn dump(config: &AppConfig, source: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&config.to_file_config())?;
    println!("# effective configuration (file: {})", source.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// The feed URL must be present and valid. The webhook URL is optional
/// here, since `preview` and `events` work without it, but must be valid
/// if set.
pub fn validate(config: &AppConfig) -> ClientResult<()> {
    let feed = config.feed_config()?;
    println!("Feed URL: {}", feed.redacted_url());

    match config.webhook_url {
        Some(_) => {
            let webhook = config.dispatch_config()?;
            println!("Webhook URL: {}", webhook.redacted_url());
        }
        None => println!("Webhook URL: not set (run, watch and test-webhook will fail)"),
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(source: &Path) -> ClientResult<()> {
    println!("config: {}", source.display());
    if source != ClientConfig::default_path() {
        println!("default: {}", ClientConfig::default_path().display());
    }
    Ok(())
}
