use crate::api::handlers::{booking, developer, health, notification, session, wallet};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Developer profiles & availability
        .route("/api/v1/developers", post(developer::create_profile).get(developer::list_developers))
        .route("/api/v1/developers/{developer_id}", get(developer::get_developer).put(developer::update_profile))
        .route("/api/v1/developers/{developer_id}/availability", axum::routing::put(developer::update_availability))

        // Public booking flow
        .route("/api/v1/developers/{developer_id}/dates", get(developer::get_available_dates))
        .route("/api/v1/developers/{developer_id}/slots", get(developer::get_slots))
        .route("/api/v1/developers/{developer_id}/book", post(booking::create_booking))

        // Dashboards
        .route("/api/v1/developers/{developer_id}/bookings", get(booking::list_developer_bookings))
        .route("/api/v1/developers/{developer_id}/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/{notification_id}/read", post(notification::mark_read))
        .route("/api/v1/bookings", get(booking::list_my_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/join-status", get(session::join_status))
        .route("/api/v1/bookings/{booking_id}/complete", post(booking::complete_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        // Payment bridge passthrough
        .route("/api/v1/wallet/{address}/balance", get(wallet::get_balance))

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
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
