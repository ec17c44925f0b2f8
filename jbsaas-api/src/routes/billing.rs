/// Billing endpoints
///
/// Creates hosted checkout sessions and reports subscription status. The
/// server records the pending subscription row and hands the browser the
/// provider's checkout URL; fulfilment happens on the provider's side.

use crate::{
    app::AppState,
    clients::billing::BillingError,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    models::{CreateSubscription, Subscription, User},
};
use serde::{Deserialize, Serialize};

/// Request to start a checkout
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Plan identifier ("starter", "professional", "enterprise")
    pub plan: String,
}

/// Checkout handoff
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// URL the browser should be sent to
    pub checkout_url: String,

    /// Provider-issued checkout ID
    pub checkout_id: String,
}

/// Creates a checkout session
///
/// `POST /v1/billing/checkout`
///
/// # Errors
///
/// - `400 Bad Request`: Unknown plan
/// - `502 Bad Gateway`: Billing provider failure
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let session = state
        .billing
        .create_checkout(&req.plan, &user.email)
        .await
        .map_err(|e| match e {
            BillingError::UnknownPlan(plan) => {
                ApiError::BadRequest(format!("Unknown plan: {}", plan))
            }
            other => ApiError::UpstreamError(other.to_string()),
        })?;

    Subscription::create(
        &state.db,
        auth.user_id,
        CreateSubscription {
            plan: req.plan,
            provider: state.billing.name().to_string(),
            checkout_id: session.checkout_id.clone(),
        },
    )
    .await?;

    tracing::info!(user_id = %auth.user_id, checkout_id = %session.checkout_id, "Checkout created");

    Ok(Json(CheckoutResponse {
        checkout_url: session.checkout_url,
        checkout_id: session.checkout_id,
    }))
}

/// Returns the user's most recent subscription, if any
///
/// `GET /v1/billing/subscription`
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Option<Subscription>>> {
    let subscription = Subscription::latest_for_user(&state.db, auth.user_id).await?;
    Ok(Json(subscription))
}
