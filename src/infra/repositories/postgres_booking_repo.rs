use crate::domain::{
    models::booking::{Booking, BookingStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use crate::infra::repositories::BOOKING_CONFLICT;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn admit(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the event type serializes admissions and duration
        // changes for it until commit.
        let duration: i32 = sqlx::query_scalar(
            "SELECT duration_minutes FROM event_types WHERE id = $1 FOR UPDATE",
        )
        .bind(&booking.event_type_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

        let (lower, upper) = booking.interval(duration).conflicting_starts();

        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM event_bookings \
             WHERE event_type_id = $1 AND status = 'confirmed' \
               AND scheduled_for > $2 AND scheduled_for < $3",
        )
        .bind(&booking.event_type_id)
        .bind(lower)
        .bind(upper)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if overlapping > 0 {
            return Err(AppError::Conflict(BOOKING_CONFLICT.into()));
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO event_bookings (
                id, event_type_id, user_email, scheduled_for, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *"#,
        )
        .bind(&booking.id)
        .bind(&booking.event_type_id)
        .bind(&booking.user_email)
        .bind(booking.scheduled_for)
        .bind(&booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM event_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_confirmed(&self, event_type_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM event_bookings \
             WHERE event_type_id = $1 AND status = 'confirmed' ORDER BY scheduled_for ASC",
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
                       WHERE e.user_id = $1 AND b.event_type_id = $2
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
                       WHERE e.user_id = $1
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
            "UPDATE event_bookings SET status = $1, updated_at = $2 \
             WHERE id = $3 AND status = $4 RETURNING *",
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
