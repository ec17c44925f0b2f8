/// Analytics model and database operations
///
/// Append-only metrics rows keyed to a post/platform pair. Rows are never
/// updated; each sync from a platform inserts a fresh snapshot and reads
/// take the latest per platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A metrics snapshot for one post on one platform
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Analytics {
    /// Unique row ID
    pub id: Uuid,

    /// Post the metrics belong to
    pub post_id: Uuid,

    /// Platform the metrics came from
    pub platform: String,

    /// Impression count
    pub impressions: i64,

    /// Like/reaction count
    pub likes: i64,

    /// Comment count
    pub comments: i64,

    /// Share/repost count
    pub shares: i64,

    /// When this snapshot was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Input for recording a metrics snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct RecordAnalytics {
    /// Platform the metrics came from
    pub platform: String,

    /// Impression count
    #[serde(default)]
    pub impressions: i64,

    /// Like/reaction count
    #[serde(default)]
    pub likes: i64,

    /// Comment count
    #[serde(default)]
    pub comments: i64,

    /// Share/repost count
    #[serde(default)]
    pub shares: i64,
}

impl Analytics {
    /// Appends a metrics snapshot for a post
    pub async fn record(
        pool: &PgPool,
        post_id: Uuid,
        data: RecordAnalytics,
    ) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, Analytics>(
            r#"
            INSERT INTO analytics (post_id, platform, impressions, likes, comments, shares)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, post_id, platform, impressions, likes, comments, shares, recorded_at
            "#,
        )
        .bind(post_id)
        .bind(data.platform)
        .bind(data.impressions)
        .bind(data.likes)
        .bind(data.comments)
        .bind(data.shares)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Lists snapshots for a post, newest first
    ///
    /// Ownership is enforced through the posts table join; a caller can only
    /// read analytics for their own posts.
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Analytics>(
            r#"
            SELECT a.id, a.post_id, a.platform, a.impressions, a.likes, a.comments, a.shares,
                   a.recorded_at
            FROM analytics a
            JOIN posts p ON p.id = a.post_id
            WHERE a.post_id = $1 AND p.user_id = $2
            ORDER BY a.recorded_at DESC
            LIMIT $3
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
