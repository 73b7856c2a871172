//! HTTP alert channels against a mock server

use std::time::Duration;

use assert_matches::assert_matches;
use system_monitor::{
    config::{Alert, Config, Discord, Webhook},
    notifier::{self, DiscordNotifier, Notification, Notifier, NotifierError, WebhookNotifier},
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cpu_notification() -> Notification {
    Notification {
        app_name: "System Monitor".to_string(),
        title: "⚠ High CPU Usage".to_string(),
        message: "CPU usage is at 90.0%".to_string(),
        timeout: Duration::from_secs(10),
    }
}

#[tokio::test]
async fn test_webhook_posts_alert() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/alerts"))
        .and(body_partial_json(serde_json::json!({
            "app": "System Monitor",
            "title": "⚠ High CPU Usage",
            "message": "CPU usage is at 90.0%",
            "timeout_secs": 10
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = WebhookNotifier::new(&Webhook {
        url: format!("{}/alerts", mock_server.uri()),
    })
    .unwrap();

    notifier.notify(&cpu_notification()).await.unwrap();
}

#[tokio::test]
async fn test_webhook_error_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&mock_server)
        .await;

    let notifier = WebhookNotifier::new(&Webhook {
        url: format!("{}/alerts", mock_server.uri()),
    })
    .unwrap();

    let result = notifier.notify(&cpu_notification()).await;
    assert_matches!(
        result,
        Err(NotifierError::Status { status, ref body }) if status.as_u16() == 500 && body == "backend down"
    );
}

#[tokio::test]
async fn test_webhook_unreachable_is_reported() {
    // Nothing listens on this port
    let notifier = WebhookNotifier::new(&Webhook {
        url: "http://127.0.0.1:9/alerts".to_string(),
    })
    .unwrap();

    let result = notifier.notify(&cpu_notification()).await;
    assert_matches!(result, Err(NotifierError::Request(_)));
}

#[tokio::test]
async fn test_discord_posts_embed_with_mention() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_partial_json(serde_json::json!({
            "content": "⚠ High CPU Usage <@123456789>",
            "embeds": [{
                "title": "⚠ High CPU Usage",
                "description": "CPU usage is at 90.0%",
                "footer": { "text": "System Monitor" }
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = DiscordNotifier::new(&Discord {
        url: format!("{}/webhook", mock_server.uri()),
        user_id: Some("123456789".to_string()),
    })
    .unwrap();

    notifier.notify(&cpu_notification()).await.unwrap();
}

#[tokio::test]
async fn test_configured_channel_is_used() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        alert: Some(Alert::Webhook(Webhook {
            url: format!("{}/hook", mock_server.uri()),
        })),
        ..Config::default()
    };

    let notifier = notifier::from_config(&config).unwrap();
    notifier.notify(&cpu_notification()).await.unwrap();
}
