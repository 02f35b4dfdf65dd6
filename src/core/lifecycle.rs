use crate::models::EventStatus;

/// Transition taken when the host opens the live page: the first visit
/// flips Scheduled to Live, every later visit (and every non-host visit)
/// leaves the status alone.
pub fn next_on_host_live_visit(status: EventStatus) -> Option<EventStatus> {
    match status {
        EventStatus::Scheduled => Some(EventStatus::Live),
        EventStatus::Live | EventStatus::Closed => None,
    }
}

/// Transition taken on host checkout. Closing is idempotent: checkout on an
/// already-Closed event is a success no-op, never an error.
pub fn next_on_checkout(status: EventStatus) -> Option<EventStatus> {
    match status {
        EventStatus::Scheduled | EventStatus::Live => Some(EventStatus::Closed),
        EventStatus::Closed => None,
    }
}

/// Closed is terminal: detail, live and feedback endpoints short-circuit.
pub fn is_read_only(status: EventStatus) -> bool {
    status == EventStatus::Closed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_live_visit_moves_scheduled_to_live() {
        assert_eq!(
            next_on_host_live_visit(EventStatus::Scheduled),
            Some(EventStatus::Live)
        );
    }

    #[test]
    fn test_repeat_live_visits_are_noops() {
        assert_eq!(next_on_host_live_visit(EventStatus::Live), None);
        assert_eq!(next_on_host_live_visit(EventStatus::Closed), None);
    }

    #[test]
    fn test_checkout_closes_from_any_open_state() {
        assert_eq!(
            next_on_checkout(EventStatus::Scheduled),
            Some(EventStatus::Closed)
        );
        assert_eq!(
            next_on_checkout(EventStatus::Live),
            Some(EventStatus::Closed)
        );
    }

    #[test]
    fn test_checkout_is_idempotent() {
        assert_eq!(next_on_checkout(EventStatus::Closed), None);
    }

    #[test]
    fn test_no_transition_moves_backward() {
        // Whatever path an event takes, every reachable next state is at
        // least as far along as where it came from.
        let order = |s: EventStatus| match s {
            EventStatus::Scheduled => 0,
            EventStatus::Live => 1,
            EventStatus::Closed => 2,
        };
        for status in [EventStatus::Scheduled, EventStatus::Live, EventStatus::Closed] {
            if let Some(next) = next_on_host_live_visit(status) {
                assert!(order(next) > order(status));
            }
            if let Some(next) = next_on_checkout(status) {
                assert!(order(next) > order(status));
            }
        }
    }

    #[test]
    fn test_only_closed_is_read_only() {
        assert!(!is_read_only(EventStatus::Scheduled));
        assert!(!is_read_only(EventStatus::Live));
        assert!(is_read_only(EventStatus::Closed));
    }
}
