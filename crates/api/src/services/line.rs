//! LINE Messaging API push client.
//!
//! Implements the ChatNotifier trait against the LINE push endpoint.
//! Pushes are fire-and-forget: every failure is logged and reported as a
//! [`NotificationResult`], never raised to the caller.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::LineConfig;
use domain::services::notification::{ChatNotifier, NotificationResult};

/// LINE push message request body.
#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

/// Chat notifier backed by the LINE Messaging API.
pub struct LineNotifier {
    client: Client,
    config: LineConfig,
}

impl LineNotifier {
    /// Create a new LINE notifier.
    pub fn new(config: LineConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn push_url(&self) -> String {
        format!(
            "{}/v2/bot/message/push",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ChatNotifier for LineNotifier {
    async fn send_text(&self, to: &str, text: &str) -> NotificationResult {
        if !self.config.enabled {
            // Console mode: log instead of calling out, mainly for local
            // development and staging without a channel token.
            info!(to = %to, text = %text, "LINE disabled, logging message instead");
            return NotificationResult::Sent;
        }

        let request = PushRequest {
            to,
            messages: vec![TextMessage {
                message_type: "text",
                text,
            }],
        };

        let response = self
            .client
            .post(self.push_url())
            .bearer_auth(&self.config.channel_access_token)
            .json(&request)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(to = %to, "LINE message sent");
                NotificationResult::Sent
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(to = %to, status = %status, "LINE push rejected: {}", body);
                NotificationResult::Failed(format!("LINE API returned {}", status))
            }
            Err(e) => {
                warn!(to = %to, "LINE push failed: {}", e);
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_config() -> LineConfig {
        LineConfig {
            enabled: false,
            channel_access_token: String::new(),
            api_base: "https://api.line.me".to_string(),
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_push_url_strips_trailing_slash() {
        let mut config = disabled_config();
        config.api_base = "http://localhost:9090/".to_string();
        let notifier = LineNotifier::new(config);
        assert_eq!(notifier.push_url(), "http://localhost:9090/v2/bot/message/push");
    }

    #[test]
    fn test_push_request_serialization() {
        let request = PushRequest {
            to: "U123",
            messages: vec![TextMessage {
                message_type: "text",
                text: "hello",
            }],
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"to\":\"U123\""));
        assert!(json.contains("\"type\":\"text\""));
        assert!(json.contains("\"text\":\"hello\""));
    }

    #[tokio::test]
    async fn test_disabled_notifier_logs_and_reports_sent() {
        let notifier = LineNotifier::new(disabled_config());
        let result = notifier.send_text("U123", "hello").await;
        assert!(matches!(result, NotificationResult::Sent));
    }
}
