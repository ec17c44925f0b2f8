/// Post lifecycle endpoints
///
/// Posts move through an explicit status machine:
///
/// ```text
/// draft ──schedule──> scheduled ──publish──> published
///   │                     │
///   └──────publish────────┘        (published is terminal)
/// ```
///
/// Transitions are enforced in SQL with conditional updates, so two
/// concurrent requests cannot both move the same post. A request against
/// a post in the wrong status comes back 409.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    models::{CreatePost, Post, PostStatus, UpdatePost},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Query parameters for listing posts
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// Restrict to one status
    pub status: Option<PostStatus>,
}

/// Request body for scheduling a post
#[derive(Debug, Deserialize)]
pub struct SchedulePostRequest {
    /// When the post should go out (must be in the future)
    pub scheduled_for: DateTime<Utc>,
}

/// Creates a draft post
///
/// `POST /v1/posts`
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePost>,
) -> ApiResult<Json<Post>> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Post content is required".to_string()));
    }

    let post = Post::create(&state.db, auth.user_id, req).await?;
    Ok(Json(post))
}

/// Lists the user's posts, optionally filtered by status
///
/// `GET /v1/posts?status=draft`
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    // No pagination is exposed on this endpoint; fetch everything.
    let posts = Post::list_by_user(&state.db, auth.user_id, query.status, i64::MAX, 0).await?;
    Ok(Json(posts))
}

/// Fetches one post
///
/// `GET /v1/posts/:id`
pub async fn get_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    let post = Post::find_by_id_and_user(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Updates a post's content (drafts and scheduled posts only)
///
/// `PUT /v1/posts/:id`
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePost>,
) -> ApiResult<Json<Post>> {
    let updated = Post::update(&state.db, id, auth.user_id, req).await?;

    match updated {
        Some(post) => Ok(Json(post)),
        None => {
            // Distinguish "not yours" from "wrong status" for the client
            match Post::find_by_id_and_user(&state.db, id, auth.user_id).await? {
                Some(_) => Err(ApiError::Conflict(
                    "Published posts cannot be edited".to_string(),
                )),
                None => Err(ApiError::NotFound("Post not found".to_string())),
            }
        }
    }
}

/// Schedules a draft post
///
/// `POST /v1/posts/:id/schedule`
pub async fn schedule_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SchedulePostRequest>,
) -> ApiResult<Json<Post>> {
    if req.scheduled_for <= Utc::now() {
        return Err(ApiError::BadRequest(
            "Scheduled time must be in the future".to_string(),
        ));
    }

    let scheduled = Post::schedule(&state.db, id, auth.user_id, req.scheduled_for).await?;

    match scheduled {
        Some(post) => Ok(Json(post)),
        None => match Post::find_by_id_and_user(&state.db, id, auth.user_id).await? {
            Some(post) => Err(ApiError::Conflict(format!(
                "Cannot schedule a {} post",
                post.status.as_str()
            ))),
            None => Err(ApiError::NotFound("Post not found".to_string())),
        },
    }
}

/// Publishes a post immediately
///
/// `POST /v1/posts/:id/publish`
pub async fn publish_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    let published = Post::publish(&state.db, id, auth.user_id).await?;

    match published {
        Some(post) => {
            tracing::info!(user_id = %auth.user_id, post_id = %post.id, "Post published");
            Ok(Json(post))
        }
        None => match Post::find_by_id_and_user(&state.db, id, auth.user_id).await? {
            Some(_) => Err(ApiError::Conflict("Post is already published".to_string())),
            None => Err(ApiError::NotFound("Post not found".to_string())),
        },
    }
}

/// Deletes a post
///
/// `DELETE /v1/posts/:id`
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Post::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    Ok(Json(json!({ "deleted": true })))
}
