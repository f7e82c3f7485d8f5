use axum::{extract::{State, Query}, response::IntoResponse};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::EventTypeQuery, responses::{data, AvailabilityResponse}};
use crate::api::handlers::required;
use crate::error::AppError;
use std::sync::Arc;

/// Per-day availability of one of the caller's event types, with the
/// weekdays/weekends summary derived from it.
pub async fn get_event_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Query(params): Query<EventTypeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event_type_id = required(params.event_type_id, "event_type_id is required")?;

    let event_type = state.event_type_repo.find_by_id(&event_type_id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;
    event_type.ensure_owned_by(&identity)?;

    let availability = event_type.availability()?;
    Ok(data(AvailabilityResponse::new(event_type.id, &availability)))
}
