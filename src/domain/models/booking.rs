use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown booking status '{0}' (expected confirmed, cancelled or completed)")]
pub struct UnknownStatus(pub String);

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, BookingStatus::Confirmed)
    }

    /// confirmed -> cancelled | completed; nothing leaves a terminal state.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub event_type_id: String,
    pub user_email: String,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub event_type_id: String,
    pub user_email: String,
    pub scheduled_for: DateTime<Utc>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_type_id: params.event_type_id,
            user_email: params.user_email,
            scheduled_for: params.scheduled_for,
            status: BookingStatus::Confirmed.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> Result<BookingStatus, UnknownStatus> {
        self.status.parse()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed.as_str()
    }

    pub fn interval(&self, duration_minutes: i32) -> BookingInterval {
        BookingInterval::new(self.scheduled_for, duration_minutes)
    }
}

/// Effective `[start, start + duration)` occupied by a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingInterval {
    pub fn new(start: DateTime<Utc>, duration_minutes: i32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes as i64),
        }
    }

    pub fn overlaps(&self, other: &BookingInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Exclusive `(lower, upper)` bounds on the start of another booking of the
    /// same duration that would overlap this interval. Lets stores express the
    /// overlap test as a plain range predicate on `scheduled_for`.
    pub fn conflicting_starts(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let length = self.end - self.start;
        (self.start - length, self.end)
    }
}
