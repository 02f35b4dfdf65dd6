use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::policy;
use crate::handlers::events::fetch_event;
use crate::models::{Rsvp, User};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WalkInPayload {
    pub email: String,
}

/// Records attendance intent. The deadline cutoff is date-based: RSVPs are
/// accepted through the end of the deadline's calendar day.
pub async fn create_rsvp(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;

    let now = Utc::now();
    if policy::rsvp_deadline_passed(event.rsvp_deadline, now) {
        return Err(AppError::DeadlineExpired(
            "RSVP deadline has passed".to_string(),
        ));
    }

    // The unique (event_id, user_id) index is the authority on duplicates;
    // concurrent double-submits surface here as Conflict.
    let rsvp = sqlx::query_as::<_, Rsvp>(
        "INSERT INTO rsvps (event_id, user_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(event.id)
    .bind(user.id)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Already RSVPed"))?;

    // Confirmation mail is an external collaborator; log the intent.
    tracing::info!(event_id = %event.id, email = %user.email, "rsvp confirmation queued");

    let message = format!(
        "You're confirmed for '{}' at {}. Confirmation email queued for {}",
        event.title,
        event.start_time.format("%Y-%m-%d %H:%M"),
        user.email
    );
    Ok(created(rsvp, message).into_response())
}

/// Sets the check-in timestamp once. A second check-in is an idempotent
/// success: the first timestamp stands.
pub async fn check_in(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;

    let rsvp = sqlx::query_as::<_, Rsvp>(
        "SELECT * FROM rsvps WHERE event_id = $1 AND user_id = $2",
    )
    .bind(event.id)
    .bind(user.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("RSVP not found".to_string()))?;

    let now = Utc::now();
    if !policy::checkin_open(event.start_time, now) {
        return Err(AppError::WindowClosed(
            "Check-in opens one hour before the event starts".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE rsvps SET check_in_time = $2 WHERE id = $1 AND check_in_time IS NULL",
    )
    .bind(rsvp.id)
    .bind(now)
    .execute(&state.pool)
    .await?;

    Ok(empty_success("Checked in").into_response())
}

/// Host-assisted RSVP + check-in for someone who shows up at the door.
/// Bypasses the deadline and window checks; the host is vouching in person.
pub async fn walk_in(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<WalkInPayload>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can record walk-ins".to_string(),
        ));
    }

    let attendee = sqlx::query_as::<_, User>(
        "SELECT id, email, username, full_name, created_at FROM users WHERE email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("No user found with that email".to_string()))?;

    // One upsert covers all three cases: no RSVP yet (insert pre-checked),
    // RSVP without check-in (stamp it now), already checked in (keep the
    // original timestamp).
    let rsvp = sqlx::query_as::<_, Rsvp>(
        "INSERT INTO rsvps (event_id, user_id, check_in_time) VALUES ($1, $2, $3) \
         ON CONFLICT (event_id, user_id) DO UPDATE \
         SET check_in_time = COALESCE(rsvps.check_in_time, EXCLUDED.check_in_time) \
         RETURNING *",
    )
    .bind(event.id)
    .bind(attendee.id)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(event_id = %event.id, attendee = %attendee.id, "walk-in recorded");
    Ok(success(rsvp, "Walk-in recorded").into_response())
}
