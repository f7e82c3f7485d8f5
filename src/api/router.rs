use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, event_type, availability, slots, booking};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
    cors::{Any, CorsLayer},
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Owner
        .route(
            "/event-types",
            get(event_type::list_event_types)
                .post(event_type::create_event_type)
                .put(event_type::update_event_type)
                .delete(event_type::delete_event_type),
        )
        .route("/event-availabilities", get(availability::get_event_availability))

        // Public booking flow
        .route("/event-slots", get(slots::list_event_slots))
        .route(
            "/event-bookings",
            get(booking::list_bookings)
                .post(booking::create_booking)
                .put(booking::update_booking_status),
        )

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
                    info!(
                        "started processing request: {} {}",
                        request.method(),
                        request.uri().path()
                    );
                })
                .on_response(
                    |response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                        info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis(),
                            "finished processing request"
                        );
                    },
                )
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Token auth only, so any origin may call in.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
