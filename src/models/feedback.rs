use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One live-feedback entry. Append-only: immutable after creation except
/// the host-toggleable `pinned` and `flagged` booleans.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    /// Empty string when the attendee sent emoji only; never null.
    pub comment: String,
    pub pinned: bool,
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
}
