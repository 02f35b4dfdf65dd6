//! Identity boundary. Credential verification happens upstream (the auth
//! proxy terminates the session and forwards the verified user id in
//! `X-User-Id`); this extractor only resolves that id to a `users` row.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::models::User;
use crate::utils::error::AppError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Use as a handler parameter to require a
/// resolved identity; requests without one are rejected with AUTH_ERROR.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Missing X-User-Id header".to_string()))?;

        let user_id = Uuid::parse_str(raw)
            .map_err(|_| AppError::AuthError("Malformed user id".to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, full_name, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Unknown user".to_string()))?;

        Ok(CurrentUser(user))
    }
}
