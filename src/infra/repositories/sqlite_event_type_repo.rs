use crate::domain::{models::event_type::EventType, ports::EventTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use crate::infra::repositories::DURATION_CONFLICT;

pub struct SqliteEventTypeRepo {
    pool: SqlitePool,
}

impl SqliteEventTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventTypeRepository for SqliteEventTypeRepo {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            r#"INSERT INTO event_types (
                id, user_id, title, description, duration_minutes, availability_json,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, EventType>("SELECT * FROM event_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError> {
        // Refuses a duration under which two confirmed bookings would overlap.
        // One statement, so it serializes with admissions on the write lock.
        let updated = sqlx::query_as::<_, EventType>(
            r#"UPDATE event_types SET
                title = ?, description = ?, duration_minutes = ?,
                availability_json = ?, updated_at = ?
               WHERE id = ? AND user_id = ?
                 AND NOT EXISTS (
                     SELECT 1 FROM event_bookings a
                     JOIN event_bookings b ON b.event_type_id = a.event_type_id AND b.id > a.id
                     WHERE a.event_type_id = event_types.id
                       AND a.status = 'confirmed' AND b.status = 'confirmed'
                       AND ABS(strftime('%s', a.scheduled_for) - strftime('%s', b.scheduled_for))
                           < ? * 60
                 )
               RETURNING *"#,
        )
        .bind(&event_type.title)
        .bind(&event_type.description)
        .bind(event_type.duration_minutes)
        .bind(&event_type.availability_json)
        .bind(event_type.updated_at)
        .bind(&event_type.id)
        .bind(&event_type.user_id)
        .bind(event_type.duration_minutes)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if let Some(updated) = updated {
            return Ok(updated);
        }

        let exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_types WHERE id = ? AND user_id = ?")
                .bind(&event_type.id)
                .bind(&event_type.user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists == 0 {
            Err(AppError::NotFound("Event type not found".into()))
        } else {
            Err(AppError::Conflict(DURATION_CONFLICT.into()))
        }
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event_types WHERE id = ?")
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
