pub mod availability;
pub mod booking;
pub mod event_type;
pub mod health;
pub mod slots;

use crate::error::AppError;

/// Trimmed, non-empty value of an optional input field.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
