use chrono::{DateTime, Duration, Utc};

use crate::models::EventStatus;

/// How long before the start time check-in opens.
pub fn checkin_lead() -> Duration {
    Duration::hours(1)
}

/// How long after the start time an event still counts as joinable when it
/// was never explicitly taken Live.
pub fn join_grace() -> Duration {
    Duration::hours(1)
}

/// Whether the RSVP button should be shown: deadlines are exact instants
/// here, unlike the ledger's date-based cutoff below.
pub fn rsvp_open(rsvp_deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < rsvp_deadline
}

/// The ledger accepts RSVPs through the end of the deadline's calendar day;
/// only a later *date* expires it.
pub fn rsvp_deadline_passed(rsvp_deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.date_naive() > rsvp_deadline.date_naive()
}

/// Check-in opens one hour before start, boundary inclusive. There is no
/// upper bound other than the event being closed.
pub fn checkin_open(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= start_time - checkin_lead()
}

/// "Join now" affordance for the calendar: the event is Live, or we are
/// within the first hour after its scheduled start.
pub fn joinable_now(status: EventStatus, start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status == EventStatus::Live || (now >= start_time && now <= start_time + join_grace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid RFC 3339 timestamp")
    }

    #[test]
    fn test_rsvp_open_is_strict_instant_comparison() {
        let deadline = at("2025-06-01T12:00:00Z");
        assert!(rsvp_open(deadline, at("2025-06-01T11:59:59Z")));
        assert!(!rsvp_open(deadline, deadline));
        assert!(!rsvp_open(deadline, at("2025-06-01T12:00:01Z")));
    }

    #[test]
    fn test_deadline_expiry_compares_dates_not_instants() {
        let deadline = at("2025-06-01T12:00:00Z");
        // Later the same day is still accepted by the ledger.
        assert!(!rsvp_deadline_passed(deadline, at("2025-06-01T23:00:00Z")));
        assert!(rsvp_deadline_passed(deadline, at("2025-06-02T00:00:00Z")));
    }

    #[test]
    fn test_checkin_opens_exactly_one_hour_before_start() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        assert!(!checkin_open(start, at("2025-06-01T16:59:59Z")));
        // Boundary is inclusive.
        assert!(checkin_open(start, at("2025-06-01T17:00:00Z")));
        assert!(checkin_open(start, at("2025-06-01T19:30:00Z")));
    }

    #[test]
    fn test_live_events_are_always_joinable() {
        let start = at("2025-06-01T18:00:00Z");
        assert!(joinable_now(
            EventStatus::Live,
            start,
            at("2025-06-01T09:00:00Z")
        ));
    }

    #[test]
    fn test_scheduled_events_joinable_only_in_grace_window() {
        let start = at("2025-06-01T18:00:00Z");
        let status = EventStatus::Scheduled;
        assert!(!joinable_now(status, start, at("2025-06-01T17:59:59Z")));
        assert!(joinable_now(status, start, start));
        assert!(joinable_now(status, start, at("2025-06-01T19:00:00Z")));
        assert!(!joinable_now(status, start, at("2025-06-01T19:00:01Z")));
    }
}
