use axum::{extract::{State, Query}, response::{IntoResponse, Response}};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::AppJson, maybe_auth::MaybeAuthUser};
use crate::api::dtos::{
    requests::{CreateBookingRequest, ListBookingsQuery, UpdateBookingRequest},
    responses::{data, PublicBookingView},
};
use crate::api::handlers::required;
use crate::domain::models::booking::BookingStatus;
use crate::domain::services::admission::{admit_booking, change_booking_status, BookingRequest};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;

/// Owners get every booking on their event types. Guests must name an event
/// type and only see when its confirmed bookings start.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Query(params): Query<ListBookingsQuery>,
) -> Result<Response, AppError> {
    if let Some(identity) = identity {
        let event_type_id = params.event_type_id.filter(|id| !id.trim().is_empty());
        let bookings = state.booking_repo
            .list_by_owner(&identity.user_id, event_type_id.as_deref())
            .await?;
        return Ok(data(bookings).into_response());
    }

    let message = "event_type_id and user_email are required for public queries";
    let event_type_id = required(params.event_type_id, message)?;
    required(params.user_email, message)?;

    let bookings: Vec<PublicBookingView> = state.booking_repo
        .list_confirmed(&event_type_id)
        .await?
        .into_iter()
        .map(PublicBookingView::from)
        .collect();

    Ok(data(bookings).into_response())
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = BookingRequest::parse(
        payload.event_type_id,
        payload.user_email,
        payload.scheduled_for,
    )?;
    let booking = admit_booking(state.booking_repo.as_ref(), request).await?;

    Ok(data(booking))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    AppJson(payload): AppJson<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = "Booking ID and status are required";
    let id = required(payload.id, message)?;
    let next = required(payload.status, message)?
        .parse::<BookingStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = change_booking_status(
        state.event_type_repo.as_ref(),
        state.booking_repo.as_ref(),
        &identity,
        &id,
        next,
        Utc::now(),
    )
    .await?;

    Ok(data(updated))
}
