use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{calendar, events, feedback, health_check, rsvps};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", post(events::create_event))
        .route("/events/mine", get(events::my_events))
        .route(
            "/events/:event_id",
            get(events::event_detail)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:event_id/live", get(events::live_page))
        .route("/events/:event_id/checkout", post(events::checkout))
        .route("/events/:event_id/summary", get(events::event_summary))
        .route("/events/:event_id/rsvp", post(rsvps::create_rsvp))
        .route("/events/:event_id/checkin", post(rsvps::check_in))
        .route("/events/:event_id/walkin", post(rsvps::walk_in))
        .route("/events/:event_id/feedback", post(feedback::submit_feedback))
        .route(
            "/events/:event_id/feedback/stream",
            get(feedback::feedback_stream),
        )
        .route(
            "/events/:event_id/feedback/:feedback_id/pin",
            post(feedback::toggle_pin),
        )
        .route(
            "/events/:event_id/feedback/:feedback_id/flag",
            post(feedback::toggle_flag),
        )
        .route("/calendar", get(calendar::calendar_view))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
