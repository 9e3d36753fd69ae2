// src/services/slack.rs

//! Slack incoming-webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SlackConfig;
use crate::services::Notifier;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    channel: &'a str,
    username: &'a str,
    text: &'a str,
}

/// Posts messages to a Slack channel through an incoming webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: Url,
    channel: String,
    username: String,
}

impl SlackNotifier {
    /// Create a notifier. Fails if `webhook_url` is not a valid URL.
    pub fn new(client: Client, webhook_url: &str, slack: &SlackConfig) -> Result<Self> {
        Ok(Self {
            client,
            webhook_url: Url::parse(webhook_url)?,
            channel: slack.channel.clone(),
            username: slack.username.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let payload = WebhookPayload {
            channel: &self.channel,
            username: &self.username,
            text,
        };

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notify(format!("webhook returned HTTP {status}")));
        }
        log::debug!("Slack accepted message ({} chars)", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn notifier_for(server: &mockito::Server) -> SlackNotifier {
        let url = format!("{}/services/T000/B000/XXXX", server.url());
        SlackNotifier::new(Client::new(), &url, &SlackConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_webhook_url() {
        let result = SlackNotifier::new(Client::new(), "hooks", &SlackConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_posts_channel_username_and_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/services/T000/B000/XXXX")
            .match_body(Matcher::Json(serde_json::json!({
                "channel": "getro-api",
                "username": "Commit Getro Bot",
                "text": "hello",
            })))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        notifier_for(&server).send("hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/services/T000/B000/XXXX")
            .with_status(404)
            .with_body("no_service")
            .create_async()
            .await;

        let err = notifier_for(&server).send("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Notify(_)));
    }
}
