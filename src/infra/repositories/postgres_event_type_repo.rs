use crate::domain::{models::event_type::EventType, ports::EventTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use crate::infra::repositories::DURATION_CONFLICT;

pub struct PostgresEventTypeRepo {
    pool: PgPool,
}

impl PostgresEventTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventTypeRepository for PostgresEventTypeRepo {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            r#"INSERT INTO event_types (
                id, user_id, title, description, duration_minutes, availability_json,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *"#,
        )
        .bind(&event_type.id)
        .bind(&event_type.user_id)
        .bind(&event_type.title)
        .bind(&event_type.description)
        .bind(event_type.duration_minutes)
        .bind(&event_type.availability_json)
        .bind(event_type.created_at)
        .bind(event_type.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EventType>, AppError> {
        sqlx::query_as::<_, EventType>("SELECT * FROM event_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Same row lock as admission, so no booking slips in while the
        // duration check runs.
        let locked: Option<String> = sqlx::query_scalar(
            "SELECT id FROM event_types WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(&event_type.id)
        .bind(&event_type.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if locked.is_none() {
            return Err(AppError::NotFound("Event type not found".into()));
        }

        let overlapping: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM event_bookings a
               JOIN event_bookings b ON b.event_type_id = a.event_type_id AND b.id > a.id
               WHERE a.event_type_id = $1
                 AND a.status = 'confirmed' AND b.status = 'confirmed'
                 AND ABS(EXTRACT(EPOCH FROM (a.scheduled_for - b.scheduled_for))) < $2 * 60"#,
        )
        .bind(&event_type.id)
        .bind(event_type.duration_minutes)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if overlapping > 0 {
            return Err(AppError::Conflict(DURATION_CONFLICT.into()));
        }

        let updated = sqlx::query_as::<_, EventType>(
            r#"UPDATE event_types SET
                title = $1, description = $2, duration_minutes = $3,
                availability_json = $4, updated_at = $5
               WHERE id = $6 RETURNING *"#,
        )
        .bind(&event_type.title)
        .bind(&event_type.description)
        .bind(event_type.duration_minutes)
        .bind(&event_type.availability_json)
        .bind(event_type.updated_at)
        .bind(&event_type.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event type not found".into()));
        }
        Ok(())
    }
}
