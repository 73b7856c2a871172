use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tracing::{info, instrument};

use super::{Notification, Notifier, NotifierError, check_response, http_client};
use crate::config::Webhook;

/// POSTs every alert as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(webhook: &Webhook) -> Result<Self, NotifierError> {
        Ok(Self {
            client: http_client()?,
            url: webhook.url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let payload = json!({
            "app": notification.app_name,
            "title": notification.title,
            "message": notification.message,
            "timeout_secs": notification.timeout.as_secs(),
            "timestamp": Utc::now().to_rfc3339()
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        check_response(response).await?;

        info!("Successfully sent webhook alert");
        Ok(())
    }
}
