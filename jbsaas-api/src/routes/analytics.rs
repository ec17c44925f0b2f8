/// Engagement metrics endpoints
///
/// Append-only snapshots of platform engagement for a post. Reads join
/// through the posts table so a caller can only see metrics for posts
/// they own.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    models::{Analytics, Post, RecordAnalytics},
};
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for listing metrics
#[derive(Debug, Deserialize)]
pub struct ListMetricsQuery {
    /// Maximum snapshots to return (default 50)
    pub limit: Option<i64>,
}

/// Records a metrics snapshot for a post
///
/// `POST /v1/analytics/posts/:id`
pub async fn record_metrics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<RecordAnalytics>,
) -> ApiResult<Json<Analytics>> {
    // Writes have no join to lean on; verify ownership first
    Post::find_by_id_and_user(&state.db, post_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let snapshot = Analytics::record(&state.db, post_id, req).await?;
    Ok(Json(snapshot))
}

/// Lists metrics snapshots for a post, newest first
///
/// `GET /v1/analytics/posts/:id?limit=20`
pub async fn list_metrics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<ListMetricsQuery>,
) -> ApiResult<Json<Vec<Analytics>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let snapshots = Analytics::list_for_post(&state.db, post_id, auth.user_id, limit).await?;
    Ok(Json(snapshots))
}
