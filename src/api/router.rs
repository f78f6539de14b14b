use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, patch},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, activity, schedule, booking, operator_booking, notification};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalog
        .route("/api/v1/activities", post(activity::create_activity).get(activity::list_my_activities))
        .route("/api/v1/activities/{id}", get(activity::get_activity).delete(activity::delete_activity))

        // Availability
        .route("/api/v1/activities/{id}/available-days", get(schedule::get_available_days))
        .route("/api/v1/activities/{id}/slots", get(schedule::get_slots).put(schedule::replace_windows))
        .route("/api/v1/activities/{id}/windows", get(schedule::list_windows))
        .route("/api/v1/activities/{id}/blocked-dates", post(schedule::block_date).delete(schedule::unblock_date))

        // Traveler bookings
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_my_bookings))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))

        // Operator bookings
        .route("/api/v1/operator/bookings", get(operator_booking::list_operator_bookings))
        .route("/api/v1/operator/bookings/{id}/status", patch(operator_booking::update_booking_status))

        .route("/api/v1/notifications", get(notification::list_notifications))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
