use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::calendar::{month_grid, month_bounds, DayCell, MONTH_NAMES};
use crate::core::policy;
use crate::models::{Event, EventStatus};
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

#[derive(Serialize)]
struct CalendarEventView {
    id: Uuid,
    title: String,
    location: String,
    start_time: DateTime<Utc>,
    status: EventStatus,
    joinable_now: bool,
}

#[derive(Serialize)]
struct CalendarPayload {
    year: i32,
    month: u32,
    month_name: &'static str,
    cells: Vec<Option<DayCell<CalendarEventView>>>,
}

/// Month grid for the current UTC month: events the caller hosts or has
/// RSVPed to, bucketed by day, padded to Monday-based weekday columns.
pub async fn calendar_view(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let (month_start, month_end) = month_bounds(now);

    // The join can only add one row per event (RSVPs are unique per
    // (event, user)), so hosted-and-RSVPed events come back once.
    let events = sqlx::query_as::<_, Event>(
        "SELECT e.* FROM events e \
         LEFT JOIN rsvps r ON r.event_id = e.id AND r.user_id = $1 \
         WHERE (e.host_id = $1 OR r.id IS NOT NULL) \
           AND e.start_time >= $2 AND e.start_time < $3 \
         ORDER BY e.start_time",
    )
    .bind(user.id)
    .bind(month_start)
    .bind(month_end)
    .fetch_all(&state.pool)
    .await?;

    let items = events
        .into_iter()
        .map(|event| {
            let view = CalendarEventView {
                joinable_now: policy::joinable_now(event.status, event.start_time, now),
                id: event.id,
                title: event.title,
                location: event.location,
                start_time: event.start_time,
                status: event.status,
            };
            (view.start_time.day(), view)
        })
        .collect();

    let payload = CalendarPayload {
        year: now.year(),
        month: now.month(),
        month_name: MONTH_NAMES[now.month0() as usize],
        cells: month_grid(now.year(), now.month(), items),
    };
    Ok(success(payload, "Calendar").into_response())
}
