//! Webhook payload types for duesoon.
//!
//! The payload is the JSON document POSTed to a Discord-compatible webhook:
//!
//! ```json
//! {
//!   "username": "イベント通知Bot",
//!   "embeds": [{ "title": "📚 課題通知", "description": "...", "color": 5793266 }]
//! }
//! ```
//!
//! Empty `content`, `username` and `avatar_url` are left out of the document
//! so that the webhook falls back to its own defaults.
//!
//! # Example
//!
//! ```rust
//! use duesoon_core::NotificationBlock;
//! use duesoon_protocol::WebhookPayload;
//!
//! let payload = WebhookPayload::new(vec![NotificationBlock::new(5793266)])
//!     .with_username("bot");
//! let json = payload.to_json().unwrap();
//! assert_eq!(json, r#"{"username":"bot","embeds":[{"color":5793266}]}"#);
//! ```

mod error;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use types::WebhookPayload;

/// Sender name used when none is configured.
pub const DEFAULT_USERNAME: &str = "イベント通知Bot";
