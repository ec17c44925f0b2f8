/// OAuth state row model and database operations
///
/// An OAuth state row is the server-side half of the authorization-code
/// handshake. It is created at initiation, redeemed exactly once at
/// callback, and worthless after its expiry.
///
/// The single-use invariant lives in `consume`: one conditional UPDATE
/// flips `used` and returns the row, so two racing callbacks can never both
/// redeem the same token. There is no application-level locking; row-level
/// atomicity is the whole mechanism.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE oauth_states (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     platform VARCHAR(50) NOT NULL,
///     state_token VARCHAR(64) NOT NULL UNIQUE,
///     code_verifier VARCHAR(128),
///     redirect_uri TEXT NOT NULL,
///     used BOOLEAN NOT NULL DEFAULT FALSE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// OAuth handshake state row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OAuthState {
    /// Unique row ID
    pub id: Uuid,

    /// User who initiated the connection
    pub user_id: Uuid,

    /// Platform being connected (e.g. "facebook", "twitter")
    pub platform: String,

    /// Opaque random state token embedded in the authorization URL
    pub state_token: String,

    /// PKCE code verifier (only for platforms that require PKCE)
    pub code_verifier: Option<String>,

    /// Redirect URI the authorization was issued for
    pub redirect_uri: String,

    /// Whether the row has been redeemed
    pub used: bool,

    /// Hard expiry; the row cannot be redeemed after this
    pub expires_at: DateTime<Utc>,

    /// When the handshake was initiated
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a new handshake state
#[derive(Debug, Clone)]
pub struct CreateOAuthState {
    /// User who initiated the connection
    pub user_id: Uuid,

    /// Platform being connected
    pub platform: String,

    /// Opaque random state token
    pub state_token: String,

    /// PKCE code verifier, if the platform requires one
    pub code_verifier: Option<String>,

    /// Redirect URI the authorization is issued for
    pub redirect_uri: String,

    /// Hard expiry
    pub expires_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, user_id, platform, state_token, code_verifier, redirect_uri, \
                       used, expires_at, created_at";

impl OAuthState {
    /// Persists a new handshake state row
    pub async fn create(pool: &PgPool, data: CreateOAuthState) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO oauth_states
                (user_id, platform, state_token, code_verifier, redirect_uri, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        );

        let state = sqlx::query_as::<_, OAuthState>(&query)
            .bind(data.user_id)
            .bind(data.platform)
            .bind(data.state_token)
            .bind(data.code_verifier)
            .bind(data.redirect_uri)
            .bind(data.expires_at)
            .fetch_one(pool)
            .await?;

        Ok(state)
    }

    /// Redeems a state token, at most once
    ///
    /// Returns the row only if it matched the platform, was unused, and had
    /// not expired, and atomically marks it used in the same statement.
    /// Any other case (unknown token, wrong platform, already consumed,
    /// expired) returns None and the caller must fail closed.
    pub async fn consume(
        pool: &PgPool,
        state_token: &str,
        platform: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE oauth_states
            SET used = TRUE
            WHERE state_token = $1
              AND platform = $2
              AND used = FALSE
              AND expires_at > NOW()
            RETURNING {COLUMNS}
            "#
        );

        let state = sqlx::query_as::<_, OAuthState>(&query)
            .bind(state_token)
            .bind(platform)
            .fetch_optional(pool)
            .await?;

        Ok(state)
    }

    /// Deletes rows past their expiry (consumed or not)
    ///
    /// Called opportunistically at initiation so the table does not grow
    /// without bound.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM oauth_states WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
