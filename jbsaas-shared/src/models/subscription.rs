/// Subscription model and database operations
///
/// One row per checkout handed off to the billing provider. The row is
/// written before redirecting the user; there is no webhook reconciliation
/// in this system, so `status` is advisory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Subscription model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Unique row ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Plan identifier (e.g. "starter", "professional")
    pub plan: String,

    /// Billing provider ("paddle" or "stripe")
    pub provider: String,

    /// Provider-issued checkout ID
    pub checkout_id: String,

    /// Advisory status (pending until the provider completes checkout)
    pub status: String,

    /// When the checkout was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a checkout
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    /// Plan identifier
    pub plan: String,

    /// Billing provider
    pub provider: String,

    /// Provider-issued checkout ID
    pub checkout_id: String,
}

impl Subscription {
    /// Records a checkout handed off to the billing provider
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateSubscription,
    ) -> Result<Self, sqlx::Error> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, plan, provider, checkout_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, plan, provider, checkout_id, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.plan)
        .bind(data.provider)
        .bind(data.checkout_id)
        .fetch_one(pool)
        .await?;

        Ok(subscription)
    }

    /// Returns a user's most recent subscription row, if any
    pub async fn latest_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, plan, provider, checkout_id, status, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(subscription)
    }
}
