/// Calendar event endpoints
///
/// Calendar events block time on the posting calendar; the slot suggester
/// treats them as busy windows.

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
    models::{CalendarEvent, CreateCalendarEvent},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Query parameters for listing events
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Start of the range (inclusive)
    pub from: DateTime<Utc>,

    /// End of the range (exclusive)
    pub to: DateTime<Utc>,
}

/// Creates a calendar event
///
/// `POST /v1/calendar/events`
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCalendarEvent>,
) -> ApiResult<Json<CalendarEvent>> {
    if req.ends_at <= req.starts_at {
        return Err(ApiError::BadRequest(
            "Event must end after it starts".to_string(),
        ));
    }

    let event = CalendarEvent::create(&state.db, auth.user_id, req).await?;
    Ok(Json(event))
}

/// Lists events overlapping a time range
///
/// `GET /v1/calendar/events?from=...&to=...`
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    if query.to <= query.from {
        return Err(ApiError::BadRequest("Invalid time range".to_string()));
    }

    let events = CalendarEvent::list_in_range(&state.db, auth.user_id, query.from, query.to).await?;
    Ok(Json(events))
}

/// Deletes an event
///
/// `DELETE /v1/calendar/events/:id`
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = CalendarEvent::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    Ok(Json(json!({ "deleted": true })))
}
