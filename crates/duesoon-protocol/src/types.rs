//! The webhook payload document.

use duesoon_core::NotificationBlock;
use serde::{Deserialize, Serialize};

use crate::ProtocolResult;

fn is_blank(s: &str) -> bool {
    s.is_empty()
}

/// Outgoing webhook message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Plain message text shown above the embeds.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub content: String,

    /// Sender name override.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub username: String,

    /// Sender avatar override.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub avatar_url: String,

    /// Notification blocks, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<NotificationBlock>,
}

impl WebhookPayload {
    /// Creates a payload carrying the given blocks and no sender identity.
    pub fn new(embeds: Vec<NotificationBlock>) -> Self {
        Self {
            embeds,
            ..Self::default()
        }
    }

    /// Builder: set the message text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder: set the sender name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Builder: set the sender avatar URL. `None` leaves the avatar unset.
    pub fn with_avatar_url(mut self, avatar_url: Option<impl Into<String>>) -> Self {
        self.avatar_url = avatar_url.map(Into::into).unwrap_or_default();
        self
    }

    /// Number of blocks in the payload.
    pub fn block_count(&self) -> usize {
        self.embeds.len()
    }

    /// Encodes the payload as compact JSON.
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encodes the payload as indented JSON, for display.
    pub fn to_json_pretty(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Encodes the payload as a JSON request body.
    pub fn to_bytes(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a payload from JSON.
    pub fn from_json(json: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
