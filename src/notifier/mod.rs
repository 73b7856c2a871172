//! Alert delivery channels
//!
//! Delivery is best-effort: a failing [`Notifier`] returns an error value,
//! which the monitor logs before carrying on with the tick.

pub mod discord;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::config::{Alert, Config};

pub use discord::DiscordNotifier;
pub use webhook::WebhookNotifier;

pub const DEFAULT_APP_NAME: &str = "System Monitor";

/// How long a notification should stay visible
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for a single delivery attempt over HTTP
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A human-visible alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Used for grouping by the receiving side
    pub app_name: String,
    pub title: String,
    pub message: String,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint answered with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("notification backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError>;
}

/// Writes alerts to the log; used when no alert channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        warn!(
            app = %notification.app_name,
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}

/// Build the notifier selected by `config.alert`.
pub fn from_config(config: &Config) -> Result<Arc<dyn Notifier>, NotifierError> {
    let notifier: Arc<dyn Notifier> = match &config.alert {
        None => Arc::new(LogNotifier),
        Some(Alert::Webhook(webhook)) => Arc::new(WebhookNotifier::new(webhook)?),
        Some(Alert::Discord(discord)) => Arc::new(DiscordNotifier::new(discord)?),
    };
    Ok(notifier)
}

fn http_client() -> Result<reqwest::Client, NotifierError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Turn a non-2xx response into an error, keeping the body for diagnostics.
async fn check_response(response: reqwest::Response) -> Result<(), NotifierError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifierError::Status { status, body })
}
