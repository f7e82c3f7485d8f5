pub mod sqlite_booking_repo;
pub mod sqlite_event_type_repo;

pub mod postgres_booking_repo;
pub mod postgres_event_type_repo;

pub(crate) const BOOKING_CONFLICT: &str = "Time slot already booked";
pub(crate) const DURATION_CONFLICT: &str =
    "Existing confirmed bookings would overlap with the new duration";
