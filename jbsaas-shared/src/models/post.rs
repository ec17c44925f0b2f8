/// Post model and database operations
///
/// Posts are the tenant-owned content items produced by the editor or the
/// generation endpoint. Lifecycle is deliberately small:
///
/// ```text
/// draft → scheduled → published
/// draft → published          (publish immediately)
/// scheduled → draft          (unschedule)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE post_status AS ENUM ('draft', 'scheduled', 'published');
///
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     business_profile_id UUID REFERENCES business_profiles(id) ON DELETE SET NULL,
///     title VARCHAR(300),
///     content TEXT NOT NULL,
///     platform VARCHAR(50),
///     status post_status NOT NULL DEFAULT 'draft',
///     scheduled_for TIMESTAMPTZ,
///     published_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Being edited, not visible anywhere
    Draft,

    /// Queued for publication at `scheduled_for`
    Scheduled,

    /// Published to the target platform
    Published,
}

impl PostStatus {
    /// Converts status to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }

    /// Checks if a transition to the target status is valid
    pub fn can_transition_to(&self, target: PostStatus) -> bool {
        matches!(
            (self, target),
            (PostStatus::Draft, PostStatus::Scheduled)
                | (PostStatus::Draft, PostStatus::Published)
                | (PostStatus::Scheduled, PostStatus::Published)
                | (PostStatus::Scheduled, PostStatus::Draft)
        )
    }
}

/// Post model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Business profile the post was written for, if any
    pub business_profile_id: Option<Uuid>,

    /// Optional headline
    pub title: Option<String>,

    /// Post body
    pub content: String,

    /// Target platform (e.g. "facebook", "linkedin")
    pub platform: Option<String>,

    /// Lifecycle status
    pub status: PostStatus,

    /// When a scheduled post should go out
    pub scheduled_for: Option<DateTime<Utc>>,

    /// When the post was published
    pub published_at: Option<DateTime<Utc>>,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post (always starts as a draft)
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    /// Business profile the post is for
    pub business_profile_id: Option<Uuid>,

    /// Optional headline
    pub title: Option<String>,

    /// Post body
    pub content: String,

    /// Target platform
    pub platform: Option<String>,
}

/// Partial update for a draft post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    /// New headline
    pub title: Option<String>,

    /// New body
    pub content: Option<String>,

    /// New target platform
    pub platform: Option<String>,
}

const COLUMNS: &str = "id, user_id, business_profile_id, title, content, platform, status, \
                       scheduled_for, published_at, created_at, updated_at";

impl Post {
    /// Creates a new draft post
    pub async fn create(pool: &PgPool, user_id: Uuid, data: CreatePost) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO posts (user_id, business_profile_id, title, content, platform)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(data.business_profile_id)
            .bind(data.title)
            .bind(data.content)
            .bind(data.platform)
            .fetch_one(pool)
            .await?;

        Ok(post)
    }

    /// Finds a post by ID, scoped to its owner
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM posts
            WHERE id = $1 AND user_id = $2
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Lists a user's posts, newest first, with pagination
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM posts
            WHERE user_id = $1 AND ($2::post_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(posts)
    }

    /// Edits a draft or scheduled post
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                platform = COALESCE($5, platform),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status <> 'published'
            RETURNING {COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(user_id)
            .bind(data.title)
            .bind(data.content)
            .bind(data.platform)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Schedules a draft for publication
    ///
    /// The conditional WHERE enforces the draft → scheduled transition at the
    /// row level; a post in any other state returns None.
    pub async fn schedule(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        scheduled_for: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE posts
            SET status = 'scheduled',
                scheduled_for = $3,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'draft'
            RETURNING {COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(user_id)
            .bind(scheduled_for)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Marks a draft or scheduled post as published
    pub async fn publish(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE posts
            SET status = 'published',
                published_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status IN ('draft', 'scheduled')
            RETURNING {COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Deletes a post
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_status_as_str() {
        assert_eq!(PostStatus::Draft.as_str(), "draft");
        assert_eq!(PostStatus::Scheduled.as_str(), "scheduled");
        assert_eq!(PostStatus::Published.as_str(), "published");
    }

    #[test]
    fn test_post_status_transitions() {
        assert!(PostStatus::Draft.can_transition_to(PostStatus::Scheduled));
        assert!(PostStatus::Draft.can_transition_to(PostStatus::Published));
        assert!(PostStatus::Scheduled.can_transition_to(PostStatus::Published));
        assert!(PostStatus::Scheduled.can_transition_to(PostStatus::Draft));

        // Published is terminal
        assert!(!PostStatus::Published.can_transition_to(PostStatus::Draft));
        assert!(!PostStatus::Published.can_transition_to(PostStatus::Scheduled));
    }
}
