//! Pure decision logic: time-window policy, lifecycle transitions, feedback
//! aggregation and the calendar projection. Nothing in here touches the
//! database or the wall clock; callers capture `Utc::now()` once per request
//! and pass it in.

pub mod aggregate;
pub mod calendar;
pub mod lifecycle;
pub mod policy;
