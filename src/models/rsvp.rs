use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Attendance intent for one (event, user) pair. Unique per pair; the only
/// mutation after insert is setting `check_in_time` once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rsvp {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub check_in_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Rsvp {
    pub fn is_checked_in(&self) -> bool {
        self.check_in_time.is_some()
    }
}
