pub mod calendar;
pub mod events;
pub mod feedback;
pub mod rsvps;

use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "pulse-api",
    };

    success(payload, "Health check successful").into_response()
}
