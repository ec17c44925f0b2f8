/// Notification queue model and database operations
///
/// A database-backed delivery queue polled by the worker. Rows are claimed
/// oldest-first by `scheduled_for`; delivery is attempted at most three
/// times, after which the row is terminal.
///
/// # Lifecycle
///
/// ```text
/// pending ──(delivered)──> sent
/// pending ──(attempt fails, attempts < 3)──> pending   (attempts + 1)
/// pending ──(attempt fails, attempts = 3)──> failed    (terminal)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE notification_status AS ENUM ('pending', 'sent', 'failed');
///
/// CREATE TABLE notification_queue (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     kind VARCHAR(50) NOT NULL,
///     payload JSONB NOT NULL DEFAULT '{}',
///     status notification_status NOT NULL DEFAULT 'pending',
///     attempts INTEGER NOT NULL DEFAULT 0,
///     last_error TEXT,
///     scheduled_for TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     sent_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum delivery attempts before a notification is marked failed
pub const MAX_ATTEMPTS: i32 = 3;

/// Notification delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Waiting for delivery (or awaiting a retry)
    Pending,

    /// Delivered
    Sent,

    /// Exhausted all attempts; never retried
    Failed,
}

impl NotificationStatus {
    /// Converts status to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }

    /// Checks if the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, NotificationStatus::Sent | NotificationStatus::Failed)
    }
}

/// Queued notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique row ID
    pub id: Uuid,

    /// User the notification is for
    pub user_id: Uuid,

    /// Dispatch tag (e.g. "email", "post_published", "trial_ending")
    pub kind: String,

    /// Kind-specific payload
    pub payload: JsonValue,

    /// Delivery status
    pub status: NotificationStatus,

    /// Delivery attempts so far
    pub attempts: i32,

    /// Error from the most recent failed attempt
    pub last_error: Option<String>,

    /// Earliest time the row may be claimed
    pub scheduled_for: DateTime<Utc>,

    /// When delivery succeeded
    pub sent_at: Option<DateTime<Utc>>,

    /// When the row was enqueued
    pub created_at: DateTime<Utc>,

    /// When the row was last touched
    pub updated_at: DateTime<Utc>,
}

/// Input for enqueueing a notification
#[derive(Debug, Clone, Deserialize)]
pub struct EnqueueNotification {
    /// Dispatch tag
    pub kind: String,

    /// Kind-specific payload
    pub payload: JsonValue,

    /// Earliest delivery time (defaults to now)
    pub scheduled_for: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, user_id, kind, payload, status, attempts, last_error, \
                       scheduled_for, sent_at, created_at, updated_at";

impl Notification {
    /// Enqueues a notification for delivery
    pub async fn enqueue(
        pool: &PgPool,
        user_id: Uuid,
        data: EnqueueNotification,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO notification_queue (user_id, kind, payload, scheduled_for)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING {COLUMNS}
            "#
        );

        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(data.kind)
            .bind(data.payload)
            .bind(data.scheduled_for)
            .fetch_one(pool)
            .await?;

        Ok(notification)
    }

    /// Finds a notification by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM notification_queue
            WHERE id = $1
            "#
        );

        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(notification)
    }

    /// Counts pending notifications that are due
    pub async fn due_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM notification_queue
            WHERE status = 'pending' AND attempts < $1 AND scheduled_for <= NOW()
            "#,
        )
        .bind(MAX_ATTEMPTS)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(NotificationStatus::Pending.as_str(), "pending");
        assert_eq!(NotificationStatus::Sent.as_str(), "sent");
        assert_eq!(NotificationStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!NotificationStatus::Pending.is_terminal());
        assert!(NotificationStatus::Sent.is_terminal());
        assert!(NotificationStatus::Failed.is_terminal());
    }

    #[test]
    fn test_max_attempts_is_three() {
        assert_eq!(MAX_ATTEMPTS, 3);
    }
}
