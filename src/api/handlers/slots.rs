use axum::{extract::{State, Query}, response::IntoResponse};
use crate::state::AppState;
use crate::api::dtos::{
    requests::EventTypeQuery,
    responses::{data, group_by_date, SlotsResponse},
};
use crate::api::handlers::required;
use crate::domain::services::{
    conflict::{confirmed_starts, resolve_slots},
    slots::SlotGenerator,
};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, warn};

pub async fn list_event_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventTypeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event_type_id = required(params.event_type_id, "event_type_id is required")?;

    let event_type = state.event_type_repo.find_by_id(&event_type_id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

    let config = &state.config;
    let generator =
        SlotGenerator::for_event_type(&event_type, &config.policy, config.timezone, Utc::now())?;

    // Display flags are advisory. Without the booking list every candidate is
    // offered and admission still rejects real overlaps.
    let confirmed = match state.booking_repo.list_confirmed(&event_type.id).await {
        Ok(bookings) => confirmed_starts(&bookings),
        Err(e) => {
            warn!(
                event_type_id = %event_type.id,
                "Could not load bookings, showing all slots as available: {}", e
            );
            Vec::new()
        }
    };

    let resolved = resolve_slots(&generator, &confirmed, config.policy.conflict_buffer_minutes);
    debug!(
        event_type_id = %event_type.id,
        candidates = resolved.len(),
        booked = confirmed.len(),
        "Slots resolved"
    );

    Ok(data(SlotsResponse {
        event_type: (&event_type).into(),
        timezone: config.timezone.name().to_string(),
        dates: group_by_date(resolved),
    }))
}
