/// Social account connection endpoints
///
/// Drives the OAuth2 authorization-code handshake:
///
/// 1. `POST /v1/oauth/init` persists a single-use state row and returns
///    the provider authorization URL for the browser to visit.
/// 2. The provider redirects back to the SPA, which posts the code and
///    state to `POST /v1/oauth/callback`.
///
/// The state row is redeemable exactly once and only within its expiry;
/// anything else is a 400 with "Invalid or expired OAuth state". If the
/// user denied consent the provider's `error` parameter arrives instead
/// of a code and is surfaced without touching the state row's tokens.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    models::SocialAccount,
    oauth::{self, Platform},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

/// Request to start a connection
#[derive(Debug, Deserialize)]
pub struct InitRequest {
    /// Platform to connect ("facebook", "instagram", "linkedin", "twitter")
    pub platform: String,

    /// Where the provider should redirect after consent
    pub redirect_uri: String,
}

/// Response carrying the authorization URL
#[derive(Debug, Serialize)]
pub struct InitResponse {
    /// Provider authorization URL for the browser
    pub auth_url: String,

    /// State token embedded in that URL
    pub state: String,
}

/// Callback payload posted by the SPA after the provider redirect
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    /// Platform being connected
    pub platform: String,

    /// Authorization code (absent when the user denied consent)
    pub code: Option<String>,

    /// State token from the redirect
    pub state: Option<String>,

    /// Provider error code (e.g. "access_denied")
    pub error: Option<String>,

    /// Provider error description
    pub error_description: Option<String>,
}

fn parse_platform(value: &str) -> ApiResult<Platform> {
    Platform::from_str(value).map_err(ApiError::BadRequest)
}

/// Starts a handshake
///
/// `POST /v1/oauth/init`
pub async fn init(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<InitRequest>,
) -> ApiResult<Json<InitResponse>> {
    let platform = parse_platform(&req.platform)?;

    let initiated = oauth::initiate(
        &state.db,
        &state.platforms,
        auth.user_id,
        platform,
        &req.redirect_uri,
    )
    .await?;

    Ok(Json(InitResponse {
        auth_url: initiated.authorization_url,
        state: initiated.state,
    }))
}

/// Completes a handshake
///
/// `POST /v1/oauth/callback`
pub async fn callback(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Json(req): Json<CallbackRequest>,
) -> ApiResult<Json<SocialAccount>> {
    let platform = parse_platform(&req.platform)?;

    // The user declined at the provider; nothing to redeem
    if let Some(error) = req.error {
        let detail = req.error_description.unwrap_or(error);
        return Err(ApiError::BadRequest(format!(
            "Authorization was not granted: {}",
            detail
        )));
    }

    let (code, handshake_state) = match (req.code, req.state) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing code or state parameter".to_string(),
            ))
        }
    };

    let completed = oauth::complete(
        &state.db,
        &state.platforms,
        state.exchanger.as_ref(),
        platform,
        &code,
        &handshake_state,
    )
    .await?;

    Ok(Json(completed.account))
}

/// Lists the user's connected accounts
///
/// `GET /v1/social-accounts`
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<SocialAccount>>> {
    let accounts = SocialAccount::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(accounts))
}

/// Disconnects a platform
///
/// `DELETE /v1/social-accounts/:platform`
pub async fn disconnect_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(platform): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let platform = parse_platform(&platform)?;

    let removed =
        SocialAccount::disconnect(&state.db, auth.user_id, platform.as_str()).await?;
    if !removed {
        return Err(ApiError::NotFound("Account not connected".to_string()));
    }

    Ok(Json(json!({ "disconnected": true })))
}
