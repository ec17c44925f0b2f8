/// Connected social account model and database operations
///
/// Stores the externally issued tokens from a completed OAuth handshake.
/// One row per (user, platform); reconnecting replaces the stored tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Connected social account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SocialAccount {
    /// Unique row ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Platform (e.g. "facebook", "linkedin")
    pub platform: String,

    /// Display name of the connected account, if the provider reported one
    pub account_name: Option<String>,

    /// Provider-issued access token (never serialized to clients)
    #[serde(skip_serializing)]
    pub access_token: String,

    /// Provider-issued refresh token, if any
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// When the access token expires, if the provider reported it
    pub token_expires_at: Option<DateTime<Utc>>,

    /// When the account was first connected
    pub connected_at: DateTime<Utc>,

    /// When the tokens were last replaced
    pub updated_at: DateTime<Utc>,
}

/// Input for storing (or replacing) a connected account
#[derive(Debug, Clone)]
pub struct UpsertSocialAccount {
    /// Platform
    pub platform: String,

    /// Display name reported by the provider
    pub account_name: Option<String>,

    /// Provider-issued access token
    pub access_token: String,

    /// Provider-issued refresh token
    pub refresh_token: Option<String>,

    /// Access token expiry
    pub token_expires_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "id, user_id, platform, account_name, access_token, refresh_token, \
                       token_expires_at, connected_at, updated_at";

impl SocialAccount {
    /// Stores the tokens for a connected account, replacing any prior connection
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        data: UpsertSocialAccount,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO social_accounts
                (user_id, platform, account_name, access_token, refresh_token, token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, platform) DO UPDATE
            SET account_name = EXCLUDED.account_name,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                token_expires_at = EXCLUDED.token_expires_at,
                updated_at = NOW()
            RETURNING {COLUMNS}
            "#
        );

        let account = sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .bind(data.platform)
            .bind(data.account_name)
            .bind(data.access_token)
            .bind(data.refresh_token)
            .bind(data.token_expires_at)
            .fetch_one(pool)
            .await?;

        Ok(account)
    }

    /// Lists a user's connected accounts
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM social_accounts
            WHERE user_id = $1
            ORDER BY connected_at ASC
            "#
        );

        let accounts = sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(accounts)
    }

    /// Disconnects a platform
    pub async fn disconnect(
        pool: &PgPool,
        user_id: Uuid,
        platform: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM social_accounts WHERE user_id = $1 AND platform = $2")
                .bind(user_id)
                .bind(platform)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
