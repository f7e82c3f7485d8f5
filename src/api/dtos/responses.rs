use crate::domain::models::{
    availability::{day_name, LegacyAvailability, WeeklyAvailability, WEEK},
    booking::Booking,
    event_type::EventType,
};
use crate::domain::services::conflict::SlotAvailability;
use crate::error::AppError;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Success envelope shared by every endpoint.
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct EventTypeResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub availability: WeeklyAvailability,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventType> for EventTypeResponse {
    type Error = AppError;

    fn try_from(event_type: EventType) -> Result<Self, Self::Error> {
        let availability = event_type.availability()?;
        Ok(Self {
            id: event_type.id,
            user_id: event_type.user_id,
            title: event_type.title,
            description: event_type.description,
            duration_minutes: event_type.duration_minutes,
            availability,
            created_at: event_type.created_at,
            updated_at: event_type.updated_at,
        })
    }
}

#[derive(Serialize)]
pub struct DayAvailabilityView {
    pub day_of_week: u32,
    pub day: &'static str,
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub event_type_id: String,
    pub days: Vec<DayAvailabilityView>,
    pub legacy: LegacyAvailability,
}

impl AvailabilityResponse {
    pub fn new(event_type_id: String, availability: &WeeklyAvailability) -> Self {
        let days = WEEK
            .iter()
            .map(|day| {
                let entry = availability.day(*day);
                DayAvailabilityView {
                    day_of_week: day.num_days_from_sunday(),
                    day: day_name(*day),
                    enabled: entry.enabled,
                    start_time: entry.start_time.clone(),
                    end_time: entry.end_time.clone(),
                }
            })
            .collect();

        Self {
            event_type_id,
            days,
            legacy: availability.legacy_summary(),
        }
    }
}

/// What a visitor may see about an event type.
#[derive(Serialize)]
pub struct PublicEventTypeView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
}

impl From<&EventType> for PublicEventTypeView {
    fn from(event_type: &EventType) -> Self {
        Self {
            id: event_type.id.clone(),
            title: event_type.title.clone(),
            description: event_type.description.clone(),
            duration_minutes: event_type.duration_minutes,
        }
    }
}

#[derive(Serialize)]
pub struct SlotView {
    pub time: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub available: bool,
}

#[derive(Serialize)]
pub struct SlotDay {
    pub date: NaiveDate,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub event_type: PublicEventTypeView,
    pub timezone: String,
    pub dates: Vec<SlotDay>,
}

/// Groups resolved candidates by local date, keeping their order.
pub fn group_by_date(resolved: Vec<SlotAvailability>) -> Vec<SlotDay> {
    let mut days: Vec<SlotDay> = Vec::new();
    for SlotAvailability { slot, available } in resolved {
        let view = SlotView {
            time: slot.local_time.to_string(),
            starts_at: slot.starts_at,
            ends_at: slot.ends_at,
            available,
        };
        match days.last_mut() {
            Some(day) if day.date == slot.date => day.slots.push(view),
            _ => days.push(SlotDay { date: slot.date, slots: vec![view] }),
        }
    }
    days
}

/// Restricted booking view for unauthenticated callers.
#[derive(Serialize)]
pub struct PublicBookingView {
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
}

impl From<Booking> for PublicBookingView {
    fn from(booking: Booking) -> Self {
        Self {
            scheduled_for: booking.scheduled_for,
            status: booking.status,
        }
    }
}
