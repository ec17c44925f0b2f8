/// Mock sender for tests and development
///
/// Records every delivery in memory and can be told to fail, which is how
/// the retry and attempt-cap behavior gets tested without a provider.

use async_trait::async_trait;
use jbsaas_shared::models::Notification;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::{SendError, Sender};

/// In-memory sender
pub struct MockSender {
    name: String,
    delivered: Mutex<Vec<Uuid>>,
    /// Number of calls that should fail before deliveries start succeeding
    fail_first: AtomicU32,
}

impl MockSender {
    /// A sender that always succeeds
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delivered: Mutex::new(Vec::new()),
            fail_first: AtomicU32::new(0),
        }
    }

    /// A sender that fails its first `n` deliveries
    pub fn failing_first(name: impl Into<String>, n: u32) -> Self {
        let sender = Self::new(name);
        sender.fail_first.store(n, Ordering::SeqCst);
        sender
    }

    /// IDs delivered so far
    pub fn delivered(&self) -> Vec<Uuid> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sender for MockSender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SendError> {
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(SendError::Request("mock failure".to_string()));
        }

        self.delivered.lock().unwrap().push(notification.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jbsaas_shared::models::NotificationStatus;
    use serde_json::json;

    fn notification() -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "email".to_string(),
            payload: json!({ "to": "x@example.com" }),
            status: NotificationStatus::Pending,
            attempts: 0,
            last_error: None,
            scheduled_for: Utc::now(),
            sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_records_deliveries() {
        let sender = MockSender::new("email");
        let n = notification();

        sender.deliver(&n).await.unwrap();

        assert_eq!(sender.delivered(), vec![n.id]);
    }

    #[tokio::test]
    async fn test_fails_then_recovers() {
        let sender = MockSender::failing_first("email", 2);
        let n = notification();

        assert!(sender.deliver(&n).await.is_err());
        assert!(sender.deliver(&n).await.is_err());
        assert!(sender.deliver(&n).await.is_ok());
        assert_eq!(sender.delivered().len(), 1);
    }
}
