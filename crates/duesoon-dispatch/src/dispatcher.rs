//! Payload delivery.
//!
//! A [`Dispatcher`] takes a finished [`WebhookPayload`] and delivers it.
//! [`WebhookDispatcher`] POSTs it to a Discord-compatible webhook;
//! [`RecordingDispatcher`] keeps payloads in memory so a whole run can be
//! exercised without a network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use duesoon_core::ellipsis;
use duesoon_protocol::WebhookPayload;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, trace};

use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Longest response body kept in a [`DispatchError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Delivers notification payloads.
///
/// Implementations make exactly one delivery attempt per call.
pub trait Dispatcher: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &str;

    /// Delivers `payload`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the payload was not accepted.
    fn dispatch<'a>(&'a self, payload: &'a WebhookPayload) -> BoxFuture<'a, DispatchResult<()>>;
}

/// POSTs payloads as JSON to a webhook URL.
pub struct WebhookDispatcher {
    client: Client,
    config: DispatchConfig,
}

impl WebhookDispatcher {
    /// Creates a new webhook dispatcher.
    pub fn new(config: DispatchConfig) -> DispatchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(DispatchError::transport)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Sends one POST with the payload as the JSON body.
    pub async fn post(&self, payload: &WebhookPayload) -> DispatchResult<()> {
        let body = payload.to_bytes()?;
        trace!(
            endpoint = %self.config.redacted_url(),
            bytes = body.len(),
            "Posting payload"
        );

        let response = self
            .client
            .post(self.config.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(DispatchError::transport)?;

        let status = response.status();
        if status.is_success() {
            info!(
                endpoint = %self.config.redacted_url(),
                status = status.as_u16(),
                blocks = payload.block_count(),
                "Payload delivered"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, body = %body, "Webhook rejected payload");
        Err(DispatchError::Status {
            status: status.as_u16(),
            body: ellipsis(&body, MAX_ERROR_BODY_CHARS).into_owned(),
        })
    }
}

impl Dispatcher for WebhookDispatcher {
    fn name(&self) -> &str {
        "webhook"
    }

    fn dispatch<'a>(&'a self, payload: &'a WebhookPayload) -> BoxFuture<'a, DispatchResult<()>> {
        Box::pin(self.post(payload))
    }
}

/// Keeps every payload it is given.
///
/// Optionally fails every delivery with a fixed status, to exercise the
/// failure path of callers.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    delivered: Mutex<Vec<WebhookPayload>>,
    fail_with_status: Option<u16>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher that rejects everything with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail_with_status: Some(status),
        }
    }

    /// Returns the payloads accepted so far.
    pub fn delivered(&self) -> Vec<WebhookPayload> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn name(&self) -> &str {
        "recording"
    }

    fn dispatch<'a>(&'a self, payload: &'a WebhookPayload) -> BoxFuture<'a, DispatchResult<()>> {
        let result = match self.fail_with_status {
            Some(status) => Err(DispatchError::Status {
                status,
                body: String::new(),
            }),
            None => {
                self.delivered
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(payload.clone());
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}
