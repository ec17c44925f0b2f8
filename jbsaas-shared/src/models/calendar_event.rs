/// Calendar event model and database operations
///
/// Events block out time on a user's content calendar. The scheduling
/// optimizer reads a day's events to avoid suggesting slots that collide
/// with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Calendar event model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CalendarEvent {
    /// Unique event ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Post the event publishes, if any
    pub post_id: Option<Uuid>,

    /// Event title
    pub title: String,

    /// Start of the blocked window
    pub starts_at: DateTime<Utc>,

    /// End of the blocked window
    pub ends_at: DateTime<Utc>,

    /// When the event was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a calendar event
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCalendarEvent {
    /// Post the event publishes, if any
    pub post_id: Option<Uuid>,

    /// Event title
    pub title: String,

    /// Start of the blocked window
    pub starts_at: DateTime<Utc>,

    /// End of the blocked window
    pub ends_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Creates a calendar event
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateCalendarEvent,
    ) -> Result<Self, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events (user_id, post_id, title, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, post_id, title, starts_at, ends_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(data.post_id)
        .bind(data.title)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Lists a user's events overlapping a time range
    pub async fn list_in_range(
        pool: &PgPool,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT id, user_id, post_id, title, starts_at, ends_at, created_at
            FROM calendar_events
            WHERE user_id = $1 AND starts_at < $3 AND ends_at > $2
            ORDER BY starts_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Deletes an event
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
