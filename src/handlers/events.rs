use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::{aggregate, lifecycle, policy};
use crate::models::{Event, EventStatus, Feedback};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EventPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub rsvp_deadline: DateTime<Utc>,
    pub max_attendees: i32,
}

#[derive(Serialize)]
struct EventDetailPayload {
    event: Event,
    rsvp_open: bool,
    checkin_open: bool,
}

#[derive(Serialize)]
struct LivePagePayload {
    event: Event,
    can_moderate: bool,
}

#[derive(Serialize)]
struct SummaryPayload {
    event_id: Uuid,
    total_rsvps: i64,
    total_checkins: i64,
    #[serde(flatten)]
    feedback: aggregate::FeedbackSummary,
}

pub(crate) async fn fetch_event(pool: &PgPool, event_id: Uuid) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

/// Schedule rules shared by create and edit: the RSVP deadline must fall
/// strictly before the start. Only creation insists the start is still in
/// the future; edits may touch events already under way.
fn validate_schedule(
    start_time: DateTime<Utc>,
    rsvp_deadline: DateTime<Utc>,
    now: DateTime<Utc>,
    require_future_start: bool,
) -> Result<(), AppError> {
    if rsvp_deadline >= start_time {
        return Err(AppError::ValidationError(
            "RSVP deadline must be before event start time".to_string(),
        ));
    }
    if require_future_start && now > start_time {
        return Err(AppError::ValidationError(
            "Event time must be in the future".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let now = Utc::now();
    validate_schedule(payload.start_time, payload.rsvp_deadline, now, true)?;

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (host_id, title, description, location, start_time, rsvp_deadline, max_attendees) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(user.id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.location)
    .bind(payload.start_time)
    .bind(payload.rsvp_deadline)
    .bind(payload.max_attendees)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(event_id = %event.id, host_id = %user.id, "event created");
    Ok(created(event, "Event created").into_response())
}

pub async fn my_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE host_id = $1 ORDER BY start_time",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(events, "Hosted events").into_response())
}

pub async fn event_detail(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if lifecycle::is_read_only(event.status) {
        return Ok(empty_success("Event is closed").into_response());
    }

    let now = Utc::now();
    let payload = EventDetailPayload {
        rsvp_open: policy::rsvp_open(event.rsvp_deadline, now),
        checkin_open: policy::checkin_open(event.start_time, now),
        event,
    };
    Ok(success(payload, "Event detail").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can edit this event".to_string(),
        ));
    }

    validate_schedule(payload.start_time, payload.rsvp_deadline, Utc::now(), false)?;

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET title = $2, description = $3, location = $4, start_time = $5, \
         rsvp_deadline = $6, max_attendees = $7, updated_at = $8 WHERE id = $1 RETURNING *",
    )
    .bind(event.id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.location)
    .bind(payload.start_time)
    .bind(payload.rsvp_deadline)
    .bind(payload.max_attendees)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    Ok(success(event, "Event updated").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can delete this event".to_string(),
        ));
    }

    // RSVPs and feedback go with it via ON DELETE CASCADE.
    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event.id)
        .execute(&state.pool)
        .await?;

    tracing::info!(event_id = %event.id, "event deleted");
    Ok(empty_success("Event deleted").into_response())
}

/// The live-feedback page. The host's first visit takes a Scheduled event
/// Live; attendees need a checked-in RSVP to view it.
pub async fn live_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut event = fetch_event(&state.pool, event_id).await?;
    if lifecycle::is_read_only(event.status) {
        return Ok(empty_success("Event is closed").into_response());
    }

    let is_host = event.is_hosted_by(user.id);
    if is_host {
        if lifecycle::next_on_host_live_visit(event.status) == Some(EventStatus::Live) {
            // Conditional update keeps the transition exactly-once under
            // concurrent first visits.
            let updated = sqlx::query(
                "UPDATE events SET status = $2, updated_at = $3 WHERE id = $1 AND status = $4",
            )
            .bind(event.id)
            .bind(EventStatus::Live)
            .bind(Utc::now())
            .bind(EventStatus::Scheduled)
            .execute(&state.pool)
            .await?;

            if updated.rows_affected() == 1 {
                tracing::info!(event_id = %event.id, "event went live");
                event.status = EventStatus::Live;
            } else {
                // Lost the race; pick up whatever state won.
                event = fetch_event(&state.pool, event_id).await?;
            }
        }
    } else {
        let rsvp = sqlx::query_as::<_, crate::models::Rsvp>(
            "SELECT * FROM rsvps WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event.id)
        .bind(user.id)
        .fetch_optional(&state.pool)
        .await?;

        match rsvp {
            None => {
                return Err(AppError::Forbidden(
                    "You must RSVP to view this page or ask the host to check you in".to_string(),
                ))
            }
            Some(rsvp) if !rsvp.is_checked_in() => {
                return Err(AppError::Forbidden(
                    "You must check in to view this page".to_string(),
                ))
            }
            Some(_) => {}
        }
    }

    let payload = LivePagePayload {
        event,
        can_moderate: is_host,
    };
    Ok(success(payload, "Live page").into_response())
}

/// Host checkout: the event goes Closed and stays there. Calling it again
/// on a Closed event succeeds without touching anything.
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can close the event".to_string(),
        ));
    }

    if lifecycle::next_on_checkout(event.status).is_some() {
        sqlx::query("UPDATE events SET status = $2, updated_at = $3 WHERE id = $1 AND status <> $2")
            .bind(event.id)
            .bind(EventStatus::Closed)
            .bind(Utc::now())
            .execute(&state.pool)
            .await?;
        tracing::info!(event_id = %event.id, "event closed");
    }

    Ok(empty_success("Event closed. Thanks for hosting!").into_response())
}

pub async fn event_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can view the summary".to_string(),
        ));
    }

    let (total_rsvps, total_checkins): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(check_in_time) FROM rsvps WHERE event_id = $1",
    )
    .bind(event.id)
    .fetch_one(&state.pool)
    .await?;

    let feedback = sqlx::query_as::<_, Feedback>(
        "SELECT * FROM feedback WHERE event_id = $1 ORDER BY created_at",
    )
    .bind(event.id)
    .fetch_all(&state.pool)
    .await?;

    let payload = SummaryPayload {
        event_id: event.id,
        total_rsvps,
        total_checkins,
        feedback: aggregate::summarize(&feedback),
    };
    Ok(success(payload, "Event summary").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid RFC 3339 timestamp")
    }

    #[test]
    fn test_deadline_must_precede_start() {
        let start = at("2025-06-01T18:00:00Z");
        let now = at("2025-05-01T00:00:00Z");
        assert!(validate_schedule(start, at("2025-06-01T12:00:00Z"), now, true).is_ok());
        // Equal timestamps are rejected too.
        assert!(matches!(
            validate_schedule(start, start, now, true),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            validate_schedule(start, at("2025-06-02T00:00:00Z"), now, true),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_past_start_rejected_only_at_creation() {
        let start = at("2025-06-01T18:00:00Z");
        let deadline = at("2025-06-01T12:00:00Z");
        let later = at("2025-06-01T19:00:00Z");
        assert!(matches!(
            validate_schedule(start, deadline, later, true),
            Err(AppError::ValidationError(_))
        ));
        // Edits to an event already under way keep working.
        assert!(validate_schedule(start, deadline, later, false).is_ok());
    }
}
