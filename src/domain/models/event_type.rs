use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::availability::WeeklyAvailability;
use crate::domain::models::identity::Identity;
use crate::error::AppError;

/// Stored event type. The weekly availability travels as embedded JSON.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventType {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub availability_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventTypeParams {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub availability: WeeklyAvailability,
}

impl EventType {
    pub fn new(params: NewEventTypeParams) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            title: params.title,
            description: params.description,
            duration_minutes: params.duration_minutes,
            availability_json: encode_availability(&params.availability)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn availability(&self) -> Result<WeeklyAvailability, AppError> {
        serde_json::from_str(&self.availability_json).map_err(|e| {
            AppError::InternalWithMsg(format!(
                "Corrupt availability for event type {}: {}",
                self.id, e
            ))
        })
    }

    pub fn set_availability(&mut self, availability: &WeeklyAvailability) -> Result<(), AppError> {
        self.availability_json = encode_availability(availability)?;
        Ok(())
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.user_id == identity.user_id
    }

    pub fn ensure_owned_by(&self, identity: &Identity) -> Result<(), AppError> {
        if self.is_owned_by(identity) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Event type belongs to another user".into()))
        }
    }
}

fn encode_availability(availability: &WeeklyAvailability) -> Result<String, AppError> {
    serde_json::to_string(availability)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to encode availability: {}", e)))
}
