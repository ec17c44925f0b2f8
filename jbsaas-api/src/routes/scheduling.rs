/// Posting-slot suggestion endpoint
///
/// Suggests scored posting slots for a day, avoiding the user's calendar
/// events. The heavy lifting lives in the shared scheduling module; this
/// handler just loads the day's busy windows and shapes the response.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    models::CalendarEvent,
    scheduling::{self, BusyWindow, SuggestedSlot, WorkingHours},
};
use serde::{Deserialize, Serialize};

/// Default number of suggestions returned
const DEFAULT_SUGGESTIONS: usize = 5;

/// Request for slot suggestions
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    /// Day to suggest slots for
    pub date: NaiveDate,

    /// Working hours (defaults to 8-18)
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,

    /// Optional content due date, boosts earlier slots as it approaches
    pub due_at: Option<DateTime<Utc>>,

    /// Maximum suggestions (default 5, capped at 20)
    pub limit: Option<usize>,
}

/// Suggested slots, best first
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<SuggestedSlot>,
}

/// Suggests posting slots for a day
///
/// `POST /v1/schedule/suggest`
pub async fn suggest_slots(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SuggestRequest>,
) -> ApiResult<Json<SuggestResponse>> {
    let hours = req.working_hours.unwrap_or_default();
    if hours.start_hour >= hours.end_hour || hours.end_hour > 24 {
        return Err(ApiError::BadRequest("Invalid working hours".to_string()));
    }

    let limit = req.limit.unwrap_or(DEFAULT_SUGGESTIONS).clamp(1, 20);

    // Busy windows come from the whole day so buffer checks at the edges
    // of the working hours still see neighbouring events
    let day_start = Utc.from_utc_datetime(
        &req.date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ApiError::BadRequest("Invalid date".to_string()))?,
    );
    let day_end = day_start + Duration::days(1);

    let busy: Vec<BusyWindow> =
        CalendarEvent::list_in_range(&state.db, auth.user_id, day_start, day_end)
            .await?
            .into_iter()
            .map(|event| BusyWindow {
                starts_at: event.starts_at,
                ends_at: event.ends_at,
            })
            .collect();

    let suggestions = scheduling::suggest_slots(req.date, hours, &busy, req.due_at, limit);

    Ok(Json(SuggestResponse { suggestions }))
}
