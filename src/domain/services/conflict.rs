use chrono::{DateTime, Utc};
use crate::domain::models::booking::Booking;
use crate::domain::services::slots::Slot;

/// Advisory proximity check used when listing slots.
///
/// A candidate is unavailable when any confirmed start lies strictly closer
/// than `buffer_minutes` to it, in either direction. This is not an interval
/// overlap test; admission performs the authoritative check.
pub fn is_slot_available<'a, I>(
    candidate: DateTime<Utc>,
    confirmed_starts: I,
    buffer_minutes: u32,
) -> bool
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
{
    let buffer_secs = buffer_minutes as i64 * 60;
    !confirmed_starts
        .into_iter()
        .any(|start| (*start - candidate).num_seconds().abs() < buffer_secs)
}

pub fn confirmed_starts(bookings: &[Booking]) -> Vec<DateTime<Utc>> {
    bookings
        .iter()
        .filter(|b| b.is_confirmed())
        .map(|b| b.scheduled_for)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: Slot,
    pub available: bool,
}

pub fn resolve_slots<I>(
    slots: I,
    confirmed: &[DateTime<Utc>],
    buffer_minutes: u32,
) -> Vec<SlotAvailability>
where
    I: IntoIterator<Item = Slot>,
{
    slots
        .into_iter()
        .map(|slot| SlotAvailability {
            slot,
            available: is_slot_available(slot.starts_at, confirmed, buffer_minutes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::{BookingStatus, NewBookingParams};
    use chrono::{Duration, TimeZone};

    fn nine() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap()
    }

    fn booking_at(start: DateTime<Utc>, status: BookingStatus) -> Booking {
        let mut booking = Booking::new(NewBookingParams {
            event_type_id: "et".into(),
            user_email: "guest@example.com".into(),
            scheduled_for: start,
        });
        booking.status = status.as_str().to_string();
        booking
    }

    #[test]
    fn test_exact_and_near_starts_block() {
        let taken = [nine()];
        assert!(!is_slot_available(nine(), &taken, 30));
        assert!(!is_slot_available(nine() + Duration::minutes(29), &taken, 30));
        assert!(!is_slot_available(nine() - Duration::minutes(29), &taken, 30));
    }

    #[test]
    fn test_buffer_boundary_is_available() {
        let taken = [nine()];
        assert!(is_slot_available(nine() + Duration::minutes(30), &taken, 30));
        assert!(is_slot_available(nine() - Duration::minutes(30), &taken, 30));
    }

    #[test]
    fn test_only_confirmed_bookings_count() {
        let bookings = vec![
            booking_at(nine(), BookingStatus::Cancelled),
            booking_at(nine() + Duration::hours(1), BookingStatus::Completed),
            booking_at(nine() + Duration::hours(2), BookingStatus::Confirmed),
        ];
        let starts = confirmed_starts(&bookings);
        assert_eq!(starts, vec![nine() + Duration::hours(2)]);
        assert!(is_slot_available(nine(), &starts, 30));
    }

    #[test]
    fn test_no_bookings_everything_available() {
        assert!(is_slot_available(nine(), &[], 30));
    }
}
