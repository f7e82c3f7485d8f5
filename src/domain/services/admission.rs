use chrono::{DateTime, Timelike, Utc};
use tracing::{info, warn};
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::models::identity::Identity;
use crate::domain::ports::{BookingRepository, EventTypeRepository};
use crate::error::AppError;

/// Visitor booking command after boundary checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub event_type_id: String,
    pub user_email: String,
    pub scheduled_for: DateTime<Utc>,
}

impl BookingRequest {
    pub fn parse(
        event_type_id: Option<String>,
        user_email: Option<String>,
        scheduled_for: Option<String>,
    ) -> Result<Self, AppError> {
        let (Some(event_type_id), Some(user_email), Some(scheduled_for)) =
            (non_blank(event_type_id), non_blank(user_email), non_blank(scheduled_for))
        else {
            return Err(AppError::Validation(
                "event_type_id, user_email, and scheduled_for are required".into(),
            ));
        };

        if !looks_like_email(&user_email) {
            return Err(AppError::Validation("user_email is not a valid email address".into()));
        }

        let scheduled_for = DateTime::parse_from_rfc3339(&scheduled_for)
            .map_err(|_| {
                AppError::Validation("scheduled_for must be an RFC 3339 timestamp".into())
            })?
            .with_timezone(&Utc);
        // whole seconds keep stored timestamps uniformly formatted and comparable
        let scheduled_for = scheduled_for.with_nanosecond(0).unwrap_or(scheduled_for);

        Ok(Self { event_type_id, user_email, scheduled_for })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// One `@` with something on both sides and no whitespace.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Creates a confirmed booking. Existence, overlap and insert are one atomic
/// step inside the store; a Conflict is handed back unchanged, never retried.
pub async fn admit_booking(
    bookings: &dyn BookingRepository,
    request: BookingRequest,
) -> Result<Booking, AppError> {
    let booking = Booking::new(NewBookingParams {
        event_type_id: request.event_type_id,
        user_email: request.user_email,
        scheduled_for: request.scheduled_for,
    });

    match bookings.admit(&booking).await {
        Ok(created) => {
            info!(
                booking_id = %created.id,
                event_type_id = %created.event_type_id,
                scheduled_for = %created.scheduled_for,
                "Booking admitted"
            );
            Ok(created)
        }
        Err(AppError::Conflict(msg)) => {
            warn!(
                event_type_id = %booking.event_type_id,
                scheduled_for = %booking.scheduled_for,
                "Booking rejected: {}", msg
            );
            Err(AppError::Conflict(msg))
        }
        Err(e) => Err(e),
    }
}

/// Owner-driven status change of a booking on one of their event types.
pub async fn change_booking_status(
    event_types: &dyn EventTypeRepository,
    bookings: &dyn BookingRepository,
    identity: &Identity,
    booking_id: &str,
    next: BookingStatus,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let booking = bookings.find_by_id(booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let event_type = event_types.find_by_id(&booking.event_type_id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;
    event_type.ensure_owned_by(identity)?;

    let current = booking.status()
        .map_err(|e| AppError::InternalWithMsg(format!("Booking {}: {}", booking.id, e)))?;

    if !current.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "Cannot change booking status from {} to {}", current, next
        )));
    }
    if next == BookingStatus::Completed && booking.scheduled_for > now {
        return Err(AppError::Validation(
            "A booking can only be completed after its scheduled time".into(),
        ));
    }

    let updated = bookings.update_status(&booking.id, current, next, now).await?
        .ok_or(AppError::Conflict("Booking status was changed concurrently".into()))?;

    info!(booking_id = %updated.id, from = %current, to = %next, "Booking status changed");
    Ok(updated)
}
