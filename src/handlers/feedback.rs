use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::lifecycle;
use crate::handlers::events::fetch_event;
use crate::models::Feedback;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

/// Size of the polling snapshot window.
const RECENT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct FeedbackPayload {
    pub emoji: String,
    /// Absent comments are stored as the empty string, never null.
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize)]
struct FeedbackStreamPayload {
    entries: Vec<Feedback>,
    /// Host-only moderation affordances (pin/flag buttons) for the client.
    can_moderate: bool,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if lifecycle::is_read_only(event.status) {
        return Err(AppError::WindowClosed(
            "Event is closed and no longer accepts feedback".to_string(),
        ));
    }
    if payload.emoji.is_empty() {
        return Err(AppError::ValidationError(
            "Emoji must not be empty".to_string(),
        ));
    }

    let feedback = sqlx::query_as::<_, Feedback>(
        "INSERT INTO feedback (event_id, user_id, emoji, comment) VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(event.id)
    .bind(user.id)
    .bind(&payload.emoji)
    .bind(&payload.comment)
    .fetch_one(&state.pool)
    .await?;

    Ok(created(feedback, "Feedback received").into_response())
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, feedback_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can toggle pin".to_string(),
        ));
    }

    let feedback = sqlx::query_as::<_, Feedback>(
        "UPDATE feedback SET pinned = NOT pinned WHERE id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(feedback_id)
    .bind(event.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    Ok(success(feedback, "Pin toggled").into_response())
}

pub async fn toggle_flag(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, feedback_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;
    if !event.is_hosted_by(user.id) {
        return Err(AppError::Forbidden(
            "Only the host can toggle flag".to_string(),
        ));
    }

    let feedback = sqlx::query_as::<_, Feedback>(
        "UPDATE feedback SET flagged = NOT flagged WHERE id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(feedback_id)
    .bind(event.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    Ok(success(feedback, "Flag toggled").into_response())
}

/// Polling snapshot: the newest ten entries, returned oldest-to-newest so
/// the client can render top-down without reordering between polls.
pub async fn feedback_stream(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&state.pool, event_id).await?;

    let mut entries = sqlx::query_as::<_, Feedback>(
        "SELECT * FROM feedback WHERE event_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(event.id)
    .bind(RECENT_LIMIT)
    .fetch_all(&state.pool)
    .await?;
    entries.reverse();

    let payload = FeedbackStreamPayload {
        entries,
        can_moderate: event.is_hosted_by(user.id),
    };
    Ok(success(payload, "Recent feedback").into_response())
}
