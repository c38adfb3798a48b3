//! Chat notification service.
//!
//! Abstraction over the outbound chat channel used to tell customers their
//! delivery is approaching. Delivery is fire-and-forget: implementations
//! report failures through [`NotificationResult`] and never raise them.

/// Result of a chat push attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    /// Message was accepted by the chat provider.
    Sent,
    /// The recipient has no linked chat identity.
    NoRecipient,
    /// Push failed (logged, non-blocking).
    Failed(String),
}

/// Outbound chat push trait.
#[async_trait::async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Send a plain text message to an external chat identity.
    async fn send_text(&self, to: &str, text: &str) -> NotificationResult;
}

/// Recording notifier for tests and local development.
///
/// Stores every message instead of sending it, and can be switched to
/// simulate provider failures.
#[derive(Debug, Default)]
pub struct RecordingChatNotifier {
    sent: tokio::sync::Mutex<Vec<(String, String)>>,
    pub simulate_failure: bool,
}

impl RecordingChatNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier that fails every push.
    pub fn failing() -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
            simulate_failure: true,
        }
    }

    /// Messages recorded so far as (recipient, text) pairs.
    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ChatNotifier for RecordingChatNotifier {
    async fn send_text(&self, to: &str, text: &str) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(to = %to, "Recording notifier simulating failure");
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(to = %to, text = %text, "Recording notifier captured message");
        self.sent
            .lock()
            .await
            .push((to.to_string(), text.to_string()));
        NotificationResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier_captures_messages() {
        let notifier = RecordingChatNotifier::new();

        let result = notifier.send_text("U123", "hello").await;
        assert!(matches!(result, NotificationResult::Sent));

        let sent = notifier.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "U123");
        assert_eq!(sent[0].1, "hello");
    }

    #[tokio::test]
    async fn test_failing_notifier_reports_failure() {
        let notifier = RecordingChatNotifier::failing();

        let result = notifier.send_text("U123", "hello").await;
        assert!(matches!(result, NotificationResult::Failed(_)));
        assert!(notifier.sent_messages().await.is_empty());
    }
}
