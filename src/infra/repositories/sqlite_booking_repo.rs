use crate::domain::{
    models::booking::{Booking, BookingStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use crate::infra::repositories::BOOKING_CONFLICT;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn admit(&self, booking: &Booking) -> Result<Booking, AppError> {
        // Single autocommit statement: SQLite takes the write lock before the
        // event type's duration and the overlap check are read, so concurrent
        // admissions and duration changes serialize here.
        let admitted = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO event_bookings (
                id, event_type_id, user_email, scheduled_for, status, created_at, updated_at
            )
            SELECT ?, e.id, ?, ?, ?, ?, ?
            FROM event_types e
            WHERE e.id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM event_bookings b
                  WHERE b.event_type_id = e.id AND b.status = 'confirmed'
                    AND ABS(strftime('%s', b.scheduled_for) - strftime('%s', ?))
                        < e.duration_minutes * 60
              )
            RETURNING *"#,
        )
        .bind(&booking.id)
        .bind(&booking.user_email)
        .bind(booking.scheduled_for)
        .bind(&booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .bind(&booking.event_type_id)
        .bind(booking.scheduled_for)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if let Some(admitted) = admitted {
            return Ok(admitted);
        }

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_types WHERE id = ?")
            .bind(&booking.event_type_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if exists == 0 {
            Err(AppError::NotFound("Event type not found".into()))
        } else {
            Err(AppError::Conflict(BOOKING_CONFLICT.into()))
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM event_bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_confirmed(&self, event_type_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM event_bookings \
             WHERE event_type_id = ? AND status = 'confirmed' ORDER BY scheduled_for ASC",
        )
        .bind(event_type_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_owner(
        &self,
        user_id: &str,
        event_type_id: Option<&str>,
    ) -> Result<Vec<Booking>, AppError> {
        match event_type_id {
            Some(event_type_id) => {
                sqlx::query_as::<_, Booking>(
                    r#"SELECT b.* FROM event_bookings b
                       JOIN event_types e ON e.id = b.event_type_id
                       WHERE e.user_id = ? AND b.event_type_id = ?
                       ORDER BY b.scheduled_for ASC"#,
                )
                .bind(user_id)
                .bind(event_type_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    r#"SELECT b.* FROM event_bookings b
                       JOIN event_types e ON e.id = b.event_type_id
                       WHERE e.user_id = ?
                       ORDER BY b.scheduled_for ASC"#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(AppError::Database)
    }

    async fn update_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE event_bookings SET status = ?, updated_at = ? \
             WHERE id = ? AND status = ? RETURNING *",
        )
        .bind(to.as_str())
        .bind(at)
        .bind(id)
        .bind(from.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
