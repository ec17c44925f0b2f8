/// Notification queue reader
///
/// Polls the database for due notifications and claims them for delivery.
///
/// # Claiming
///
/// Claims are a single conditional UPDATE over `FOR UPDATE SKIP LOCKED`
/// that also pushes `scheduled_for` forward by a lease interval. The
/// skip-locked select keeps two statements racing on the same rows apart;
/// the lease keeps a claimed row invisible to other workers after the
/// statement commits, for as long as delivery should reasonably take. A
/// crashed worker's rows become claimable again once the lease lapses.
/// A row is claimable when it is pending, due, and under the attempt cap.
///
/// # Failure accounting
///
/// Each failed delivery increments `attempts` and records the error. The
/// third failure flips the row to `failed`, a terminal state the worker
/// never picks up again.

use chrono::{DateTime, Utc};
use jbsaas_shared::models::notification::{Notification, MAX_ATTEMPTS};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Notification queue error
#[derive(Debug, Error)]
pub enum QueueError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Notification not found
    #[error("Notification not found: {0}")]
    NotFound(Uuid),
}

/// Seconds a claimed row stays invisible to other workers
///
/// Must exceed the worst-case time to deliver one batch, or a slow
/// delivery can be picked up again mid-flight.
const CLAIM_LEASE_SECONDS: i32 = 60;

const COLUMNS: &str =
    "notification_queue.id, notification_queue.user_id, notification_queue.kind, \
     notification_queue.payload, notification_queue.status, notification_queue.attempts, \
     notification_queue.last_error, notification_queue.scheduled_for, \
     notification_queue.sent_at, notification_queue.created_at, notification_queue.updated_at";

/// Notification queue reader
#[derive(Clone)]
pub struct NotificationQueue {
    /// Database connection pool
    db: PgPool,

    /// Maximum rows to claim in one batch
    batch_size: usize,
}

impl NotificationQueue {
    /// Creates a new queue reader
    pub fn new(db: PgPool) -> Self {
        NotificationQueue { db, batch_size: 10 }
    }

    /// Creates a new queue reader with custom batch size
    pub fn with_batch_size(db: PgPool, batch_size: usize) -> Self {
        NotificationQueue { db, batch_size }
    }

    /// Claims due notifications for delivery
    ///
    /// Claimed rows stay `pending` but their `scheduled_for` is pushed
    /// forward by the lease, so no other worker sees them as due until the
    /// lease lapses. A successful delivery ends with `mark_sent`; a failure
    /// ends with `record_failure`, which overwrites the lease with the real
    /// retry time.
    pub async fn claim_due(&self, limit: Option<usize>) -> Result<Vec<Notification>, QueueError> {
        let limit = limit.unwrap_or(self.batch_size) as i64;

        let query = format!(
            r#"
            WITH due AS (
                SELECT id
                FROM notification_queue
                WHERE status = 'pending'
                  AND attempts < $1
                  AND scheduled_for <= NOW()
                ORDER BY scheduled_for ASC
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            UPDATE notification_queue
            SET scheduled_for = NOW() + ($3 * INTERVAL '1 second'),
                updated_at = NOW()
            FROM due
            WHERE notification_queue.id = due.id
            RETURNING {COLUMNS}
            "#
        );

        let notifications = sqlx::query_as::<_, Notification>(&query)
            .bind(MAX_ATTEMPTS)
            .bind(limit)
            .bind(CLAIM_LEASE_SECONDS)
            .fetch_all(&self.db)
            .await?;

        Ok(notifications)
    }

    /// Marks a notification as delivered
    pub async fn mark_sent(&self, id: Uuid) -> Result<(), QueueError> {
        let result = sqlx::query(
            r#"
            UPDATE notification_queue
            SET status = 'sent', sent_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueError::NotFound(id));
        }

        Ok(())
    }

    /// Records a failed delivery attempt
    ///
    /// Increments the attempt counter and stores the error. The row flips
    /// to `failed` when the incremented count reaches the cap; otherwise
    /// it stays `pending` and is retried with a delay.
    ///
    /// Returns the notification's new status fields for logging.
    pub async fn record_failure(
        &self,
        id: Uuid,
        error: &str,
        retry_at: DateTime<Utc>,
    ) -> Result<FailureRecord, QueueError> {
        let record = sqlx::query_as::<_, FailureRecord>(
            r#"
            UPDATE notification_queue
            SET attempts = attempts + 1,
                last_error = $2,
                status = CASE WHEN attempts + 1 >= $3 THEN 'failed'::notification_status
                              ELSE 'pending'::notification_status END,
                scheduled_for = CASE WHEN attempts + 1 >= $3 THEN scheduled_for ELSE $4 END,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING attempts, (status = 'failed') AS exhausted
            "#,
        )
        .bind(id)
        .bind(error)
        .bind(MAX_ATTEMPTS)
        .bind(retry_at)
        .fetch_optional(&self.db)
        .await?
        .ok_or(QueueError::NotFound(id))?;

        Ok(record)
    }

    /// Counts rows currently claimable (for logging and health checks)
    pub async fn due_count(&self) -> Result<i64, QueueError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM notification_queue
            WHERE status = 'pending' AND attempts < $1 AND scheduled_for <= NOW()
            "#,
        )
        .bind(MAX_ATTEMPTS)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }
}

/// Outcome of recording a failure
#[derive(Debug, sqlx::FromRow)]
pub struct FailureRecord {
    /// Attempts consumed so far
    pub attempts: i32,

    /// Whether the row reached the terminal `failed` state
    pub exhausted: bool,
}
