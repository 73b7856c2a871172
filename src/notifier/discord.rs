use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use super::{Notification, Notifier, NotifierError, check_response, http_client};
use crate::config::Discord;

const ALERT_COLOR: u32 = 15158332; // Red

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Default)]
pub struct MessageBuilder {
    content: Option<String>,
    embeds: Vec<Embed>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl ToString) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn add_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn build(self) -> Message {
        Message {
            content: self.content,
            embeds: self.embeds,
        }
    }
}

/// Sends alerts to a Discord channel webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: Client,
    url: String,
    user_id: Option<String>,
}

impl DiscordNotifier {
    pub fn new(discord: &Discord) -> Result<Self, NotifierError> {
        Ok(Self {
            client: http_client()?,
            url: discord.url.clone(),
            user_id: discord.user_id.clone(),
        })
    }

    pub fn build_message(&self, notification: &Notification) -> Message {
        let embed = Embed {
            title: Some(notification.title.clone()),
            description: Some(notification.message.clone()),
            color: Some(ALERT_COLOR),
            footer: Some(EmbedFooter {
                text: notification.app_name.clone(),
            }),
            timestamp: Some(Utc::now().to_rfc3339()),
        };

        let mut builder = MessageBuilder::new().add_embed(embed);
        if let Some(user_id) = &self.user_id {
            builder = builder.content(format!("{} <@{user_id}>", notification.title));
        }
        builder.build()
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    #[instrument(skip_all)]
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        let message = self.build_message(notification);

        let response = self.client.post(&self.url).json(&message).send().await?;
        check_response(response).await?;

        info!("Successfully sent Discord message");
        Ok(())
    }
}
