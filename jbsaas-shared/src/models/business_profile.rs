/// Business profile model and database operations
///
/// A user can run several businesses (e.g. two clinic locations); each gets
/// its own profile carrying branding and compliance flags. Profiles are
/// soft-deleted: rows keep their history and `deleted_at` excludes them from
/// every query here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE business_profiles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     business_name VARCHAR(200) NOT NULL,
///     industry VARCHAR(100) NOT NULL,
///     website_url TEXT,
///     brand_voice TEXT,
///     is_healthcare BOOLEAN NOT NULL DEFAULT FALSE,
///     ahpra_registration VARCHAR(20),
///     abn VARCHAR(11),
///     deleted_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Business profile model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessProfile {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Trading name
    pub business_name: String,

    /// Industry label (e.g. "dental", "physiotherapy", "retail")
    pub industry: String,

    /// Public website, if any
    pub website_url: Option<String>,

    /// Free-text brand voice guidance fed to content generation
    pub brand_voice: Option<String>,

    /// Whether healthcare advertising compliance applies (AHPRA guidelines)
    pub is_healthcare: bool,

    /// AHPRA registration number, if the business is a registered practitioner
    pub ahpra_registration: Option<String>,

    /// Australian Business Number
    pub abn: Option<String>,

    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a business profile
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusinessProfile {
    /// Trading name
    pub business_name: String,

    /// Industry label
    pub industry: String,

    /// Public website
    pub website_url: Option<String>,

    /// Brand voice guidance
    pub brand_voice: Option<String>,

    /// Healthcare compliance flag
    #[serde(default)]
    pub is_healthcare: bool,

    /// AHPRA registration number
    pub ahpra_registration: Option<String>,

    /// Australian Business Number
    pub abn: Option<String>,
}

/// Partial update for a business profile
///
/// Only the provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBusinessProfile {
    /// New trading name
    pub business_name: Option<String>,

    /// New industry label
    pub industry: Option<String>,

    /// New website
    pub website_url: Option<String>,

    /// New brand voice guidance
    pub brand_voice: Option<String>,

    /// New healthcare flag
    pub is_healthcare: Option<bool>,
}

const COLUMNS: &str = "id, user_id, business_name, industry, website_url, brand_voice, \
                       is_healthcare, ahpra_registration, abn, deleted_at, created_at, updated_at";

impl BusinessProfile {
    /// Creates a new business profile for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateBusinessProfile,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO business_profiles
                (user_id, business_name, industry, website_url, brand_voice,
                 is_healthcare, ahpra_registration, abn)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(user_id)
            .bind(data.business_name)
            .bind(data.industry)
            .bind(data.website_url)
            .bind(data.brand_voice)
            .bind(data.is_healthcare)
            .bind(data.ahpra_registration)
            .bind(data.abn)
            .fetch_one(pool)
            .await?;

        Ok(profile)
    }

    /// Finds a profile by ID, scoped to its owner
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM business_profiles
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#
        );

        let profile = sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    /// Lists a user's active profiles
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM business_profiles
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#
        );

        let profiles = sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(profiles)
    }

    /// Applies a partial update
    ///
    /// COALESCE keeps the stored value for any field the caller omitted.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateBusinessProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE business_profiles
            SET business_name = COALESCE($3, business_name),
                industry = COALESCE($4, industry),
                website_url = COALESCE($5, website_url),
                brand_voice = COALESCE($6, brand_voice),
                is_healthcare = COALESCE($7, is_healthcare),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(id)
            .bind(user_id)
            .bind(data.business_name)
            .bind(data.industry)
            .bind(data.website_url)
            .bind(data.brand_voice)
            .bind(data.is_healthcare)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    /// Soft-deletes a profile
    ///
    /// Returns false if the profile does not exist, belongs to another user,
    /// or was already deleted.
    pub async fn soft_delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE business_profiles
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
