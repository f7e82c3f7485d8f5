use crate::domain::models::{booking::{Booking, BookingStatus}, event_type::EventType};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventTypeRepository: Send + Sync {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<EventType>, AppError>;
    /// Newest first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<EventType>, AppError>;
    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError>;
    /// Removes the event type together with its bookings.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `booking` as confirmed, as a single atomic unit.
    ///
    /// Fails with `NotFound` when the event type is missing and with
    /// `Conflict` when a confirmed booking of the same event type overlaps
    /// `[scheduled_for, scheduled_for + duration)`.
    async fn admit(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_confirmed(&self, event_type_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_owner(
        &self,
        user_id: &str,
        event_type_id: Option<&str>,
    ) -> Result<Vec<Booking>, AppError>;
    /// Compare-and-set on status. `None` when the booking is no longer in `from`.
    async fn update_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, AppError>;
}
