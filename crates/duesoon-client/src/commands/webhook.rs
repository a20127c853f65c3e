//! `duesoon test-webhook`: check the webhook URL with a plain message.

use duesoon_dispatch::{Dispatcher, WebhookDispatcher};
use duesoon_protocol::WebhookPayload;
use tracing::info;

use crate::config::AppConfig;
use crate::error::ClientResult;

/// Text of the test message.
pub const TEST_MESSAGE: &str = "これはテストメッセージです";

/// Builds the test message payload with the configured sender identity.
pub fn test_payload(config: &AppConfig) -> WebhookPayload {
    config.payload(Vec::new()).with_content(TEST_MESSAGE)
}

/// Posts [`TEST_MESSAGE`] to the configured webhook.
pub async fn test_webhook(config: &AppConfig) -> ClientResult<()> {
    let dispatch_config = config.dispatch_config()?;
    let target = dispatch_config.redacted_url();
    let dispatcher = WebhookDispatcher::new(dispatch_config)?;

    dispatcher.dispatch(&test_payload(config)).await?;
    info!(webhook = %target, "Test message delivered");
    println!("Test message sent to {target}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duesoon_dispatch::RecordingDispatcher;

    #[test]
    fn test_payload_has_content_and_no_blocks() {
        let payload = test_payload(&AppConfig::default());
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"content":"これはテストメッセージです","username":"イベント通知Bot"}"#
        );
    }

    #[tokio::test]
    async fn test_payload_is_dispatchable() {
        let dispatcher = RecordingDispatcher::new();
        dispatcher
            .dispatch(&test_payload(&AppConfig::default()))
            .await
            .unwrap();
        assert_eq!(dispatcher.delivered()[0].content, TEST_MESSAGE);
    }
}
