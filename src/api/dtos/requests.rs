use crate::domain::models::availability::WeeklyAvailability;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEventTypeRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub availability: WeeklyAvailability,
}

/// Partial update; absent fields keep their stored value. An empty
/// description clears it.
#[derive(Deserialize)]
pub struct UpdateEventTypeRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub availability: Option<WeeklyAvailability>,
}

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Deserialize)]
pub struct EventTypeQuery {
    pub event_type_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub event_type_id: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub event_type_id: Option<String>,
    pub user_email: Option<String>,
    pub scheduled_for: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub id: Option<String>,
    pub status: Option<String>,
}
