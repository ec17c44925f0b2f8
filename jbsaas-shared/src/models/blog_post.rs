/// Blog post model and database operations
///
/// Public editorial content served by `/api/blog`, independent of the tenant
/// model and keyed by a unique slug. Only published posts are ever visible
/// through the public queries here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE blog_posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     slug VARCHAR(200) NOT NULL UNIQUE,
///     title VARCHAR(300) NOT NULL,
///     content TEXT NOT NULL,
///     excerpt TEXT,
///     category VARCHAR(100),
///     author VARCHAR(100),
///     featured BOOLEAN NOT NULL DEFAULT FALSE,
///     published BOOLEAN NOT NULL DEFAULT FALSE,
///     published_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Blog post model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogPost {
    /// Unique post ID
    pub id: Uuid,

    /// URL slug (unique)
    pub slug: String,

    /// Headline
    pub title: String,

    /// Article body (markdown)
    pub content: String,

    /// Short teaser for list views
    pub excerpt: Option<String>,

    /// Editorial category
    pub category: Option<String>,

    /// Byline
    pub author: Option<String>,

    /// Whether the post is pinned as featured
    pub featured: bool,

    /// Whether the post is publicly visible
    pub published: bool,

    /// When the post went live
    pub published_at: Option<DateTime<Utc>>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a blog post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogPost {
    /// URL slug
    pub slug: String,

    /// Headline
    pub title: String,

    /// Article body
    pub content: String,

    /// Teaser
    pub excerpt: Option<String>,

    /// Category
    pub category: Option<String>,

    /// Byline
    pub author: Option<String>,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// Publish immediately
    #[serde(default)]
    pub published: bool,
}

/// Filters for the public list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostFilter {
    /// Maximum rows to return (clamped to 1..=50, default 10)
    pub limit: Option<i64>,

    /// Restrict to one category
    pub category: Option<String>,

    /// Restrict to featured posts
    pub featured: Option<bool>,
}

const COLUMNS: &str = "id, slug, title, content, excerpt, category, author, featured, \
                       published, published_at, created_at, updated_at";

impl BlogPost {
    /// Creates a blog post
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint violation if the slug is already taken.
    pub async fn create(pool: &PgPool, data: CreateBlogPost) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO blog_posts
                (slug, title, content, excerpt, category, author, featured, published, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CASE WHEN $8 THEN NOW() ELSE NULL END)
            RETURNING {COLUMNS}
            "#
        );

        let post = sqlx::query_as::<_, BlogPost>(&query)
            .bind(data.slug)
            .bind(data.title)
            .bind(data.content)
            .bind(data.excerpt)
            .bind(data.category)
            .bind(data.author)
            .bind(data.featured)
            .bind(data.published)
            .fetch_one(pool)
            .await?;

        Ok(post)
    }

    /// Finds a published post by slug
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM blog_posts
            WHERE slug = $1 AND published
            "#
        );

        let post = sqlx::query_as::<_, BlogPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Lists published posts, newest first, with optional category/featured filters
    pub async fn list_published(
        pool: &PgPool,
        filter: BlogPostFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(10).clamp(1, 50);

        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM blog_posts
            WHERE published
              AND ($1::varchar IS NULL OR category = $1)
              AND ($2::boolean IS NULL OR featured = $2)
            ORDER BY published_at DESC NULLS LAST
            LIMIT $3
            "#
        );

        let posts = sqlx::query_as::<_, BlogPost>(&query)
            .bind(filter.category)
            .bind(filter.featured)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = BlogPostFilter::default();
        assert!(filter.limit.is_none());
        assert!(filter.category.is_none());
        assert!(filter.featured.is_none());
    }

    #[test]
    fn test_filter_deserializes_from_query_shape() {
        let filter: BlogPostFilter =
            serde_json::from_str(r#"{"limit": 5, "category": "marketing", "featured": true}"#)
                .unwrap();
        assert_eq!(filter.limit, Some(5));
        assert_eq!(filter.category.as_deref(), Some("marketing"));
        assert_eq!(filter.featured, Some(true));
    }
}
