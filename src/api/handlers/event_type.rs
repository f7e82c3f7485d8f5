use axum::{extract::{State, Query}, response::IntoResponse};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::AppJson};
use crate::api::dtos::{
    requests::{CreateEventTypeRequest, IdQuery, UpdateEventTypeRequest},
    responses::{data, EventTypeResponse},
};
use crate::api::handlers::required;
use crate::domain::models::event_type::{EventType, NewEventTypeParams};
use crate::domain::services::validation::EventTypeDraft;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn list_event_types(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let event_types = state.event_type_repo.list_by_owner(&identity.user_id).await?;

    let response = event_types
        .into_iter()
        .map(EventTypeResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(data(response))
}

pub async fn create_event_type(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<CreateEventTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = EventTypeDraft {
        title: payload.title,
        description: payload.description,
        duration_minutes: payload.duration_minutes,
        availability: payload.availability,
    }
    .validate(&state.config.policy)
    .map_err(AppError::InvalidFields)?;

    let event_type = EventType::new(NewEventTypeParams {
        user_id: identity.user_id.clone(),
        title: draft.title,
        description: draft.description,
        duration_minutes: draft.duration_minutes,
        availability: draft.availability,
    })?;

    let created = state.event_type_repo.create(&event_type).await?;
    info!(event_type_id = %created.id, user_id = %identity.user_id, "Event type created");

    Ok(data(EventTypeResponse::try_from(created)?))
}

pub async fn update_event_type(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<UpdateEventTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = required(payload.id, "id is required")?;

    let mut event_type = state.event_type_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;
    event_type.ensure_owned_by(&identity)?;

    // The merged result is validated as a whole, so a partial update cannot
    // leave an invalid event type behind.
    let availability = match payload.availability {
        Some(availability) => availability,
        None => event_type.availability()?,
    };
    let draft = EventTypeDraft {
        title: payload.title.unwrap_or_else(|| event_type.title.clone()),
        description: payload.description.or_else(|| event_type.description.clone()),
        duration_minutes: payload.duration_minutes.unwrap_or(event_type.duration_minutes),
        availability,
    }
    .validate(&state.config.policy)
    .map_err(AppError::InvalidFields)?;

    event_type.title = draft.title;
    event_type.description = draft.description;
    event_type.duration_minutes = draft.duration_minutes;
    event_type.set_availability(&draft.availability)?;
    event_type.updated_at = Utc::now();

    let updated = state.event_type_repo.update(&event_type).await?;
    info!(event_type_id = %updated.id, "Event type updated");

    Ok(data(EventTypeResponse::try_from(updated)?))
}

pub async fn delete_event_type(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Query(params): Query<IdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = required(params.id, "id is required")?;

    let event_type = state.event_type_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;
    event_type.ensure_owned_by(&identity)?;

    state.event_type_repo.delete(&event_type.id).await?;
    info!(event_type_id = %event_type.id, "Event type deleted together with its bookings");

    Ok(data(serde_json::json!({ "id": event_type.id, "status": "deleted" })))
}
