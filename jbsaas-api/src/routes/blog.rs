/// Public blog endpoints
///
/// Serves published blog articles to the embeddable widget. These routes
/// are unauthenticated, CORS-open, and cacheable: list responses carry
/// `Cache-Control: public, max-age=300` so a CDN can absorb widget traffic.
///
/// # Endpoints
///
/// - `GET /api/blog` - List published articles, or one article when `?slug=` is given
/// - `GET /api/blog/posts` - List published articles (filterable)
/// - `GET /api/blog/posts/:slug` - Fetch one article by slug
///
/// # Errors
///
/// A missing or unpublished slug is a 404 with body
/// `{"error": "Article not found"}` - the shape the widget expects.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jbsaas_shared::models::{BlogPost, BlogPostFilter};
use serde::Deserialize;
use serde_json::json;

/// Seconds a CDN or browser may cache blog responses
const CACHE_MAX_AGE_SECS: u32 = 300;

fn cache_header() -> (header::HeaderName, String) {
    (
        header::CACHE_CONTROL,
        format!("public, max-age={CACHE_MAX_AGE_SECS}"),
    )
}

/// Query string for the root blog endpoint
///
/// Spelled out rather than flattening `BlogPostFilter`: serde_urlencoded
/// cannot deserialize non-string fields through `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    /// When present, return the single article with this slug
    pub slug: Option<String>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

/// Root blog endpoint
///
/// With `?slug=<s>`, returns the single published article (or the widget's
/// 404 shape). Otherwise behaves like the list endpoint.
pub async fn query_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> ApiResult<Response> {
    match query.slug {
        Some(slug) => get_post(State(state), Path(slug)).await,
        None => {
            let filter = BlogPostFilter {
                limit: query.limit,
                category: query.category,
                featured: query.featured,
            };
            list_posts(State(state), Query(filter)).await
        }
    }
}

/// Lists published articles, newest first
///
/// Query parameters: `limit` (1-50, default 10), `category`, `featured`.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<BlogPostFilter>,
) -> ApiResult<Response> {
    let posts = BlogPost::list_published(&state.db, filter).await?;

    Ok(([cache_header()], Json(json!({ "posts": posts }))).into_response())
}

/// Fetches one published article by slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    match BlogPost::find_published_by_slug(&state.db, &slug).await? {
        Some(post) => Ok(([cache_header()], Json(json!({ "post": post }))).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Article not found" })),
        )
            .into_response()),
    }
}
