/// AI content generation endpoint
///
/// Generates platform-ready copy for one of the user's business profiles.
/// Upstream calls run under the shared retry policy (3 attempts,
/// exponential backoff); the response reports how many attempts were
/// consumed so the client can show degraded-service hints.

use crate::{
    app::AppState,
    clients::{GeneratedContent, GenerationRequest},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use jbsaas_shared::{auth::middleware::AuthContext, models::BusinessProfile, retry::{RetryOutcome, RetryPolicy}};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to generate content
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Profile providing business context
    pub business_profile_id: Uuid,

    /// Target platform
    pub platform: String,

    /// Topic or prompt
    pub topic: String,
}

/// Generated content plus generation metadata
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// The generated copy
    #[serde(flatten)]
    pub generated: GeneratedContent,

    /// Upstream attempts consumed (1 = first try)
    pub attempts: u32,
}

/// Generates content for a profile
///
/// `POST /v1/generate`
///
/// # Errors
///
/// - `404 Not Found`: Profile does not exist or is not yours
/// - `400 Bad Request`: Empty topic
/// - `502 Bad Gateway`: Provider failed all attempts
pub async fn generate_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("Topic is required".to_string()));
    }

    let profile = BusinessProfile::find_by_id_and_user(&state.db, req.business_profile_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let generation = GenerationRequest {
        platform: req.platform,
        topic: req.topic,
        business_name: profile.business_name,
        industry: profile.industry,
        brand_voice: profile.brand_voice,
        is_healthcare: profile.is_healthcare,
    };

    let generator = state.generator.clone();
    let outcome = RetryPolicy::default()
        .run(|attempt| {
            let generator = generator.clone();
            let generation = generation.clone();
            async move {
                tracing::debug!(attempt, provider = generator.name(), "Generating content");
                generator.generate(&generation).await
            }
        })
        .await;

    match outcome {
        RetryOutcome::Succeeded { value, attempts } => Ok(Json(GenerateResponse {
            generated: value,
            attempts,
        })),
        RetryOutcome::Exhausted { error, attempts } => {
            tracing::warn!(attempts, %error, "Content generation exhausted retries");
            Err(ApiError::UpstreamError(format!(
                "Content generation failed after {} attempts: {}",
                attempts, error
            )))
        }
    }
}
