use serde::Serialize;
use crate::domain::models::availability::WeeklyAvailability;
use crate::domain::services::policy::SchedulingPolicy;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Owner-submitted event type command, before it is allowed near the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTypeDraft {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub availability: WeeklyAvailability,
}

impl EventTypeDraft {
    /// Trims the title, trims the description and drops it when empty.
    pub fn normalized(self) -> Self {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Self {
            title: self.title.trim().to_string(),
            description,
            ..self
        }
    }

    pub fn field_errors(&self, policy: &SchedulingPolicy) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len == 0 {
            errors.push(FieldError::new("title", "Title is required"));
        } else if title_len < TITLE_MIN_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at least {} characters", TITLE_MIN_CHARS),
            ));
        } else if title_len > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at most {} characters", TITLE_MAX_CHARS),
            ));
        }

        if let Some(description) = &self.description
            && description.chars().count() > DESCRIPTION_MAX_CHARS
        {
            errors.push(FieldError::new(
                "description",
                format!("Description must be at most {} characters", DESCRIPTION_MAX_CHARS),
            ));
        }

        let duration = self.duration_minutes;
        if duration < policy.min_duration_minutes as i32 {
            errors.push(FieldError::new(
                "duration_minutes",
                format!("Duration must be at least {} minutes", policy.min_duration_minutes),
            ));
        } else if duration > policy.max_duration_minutes as i32 {
            errors.push(FieldError::new(
                "duration_minutes",
                format!("Duration must be at most {} minutes", policy.max_duration_minutes),
            ));
        } else if policy.duration_step_minutes > 0
            && duration % policy.duration_step_minutes as i32 != 0
        {
            errors.push(FieldError::new(
                "duration_minutes",
                format!("Duration must be a multiple of {} minutes", policy.duration_step_minutes),
            ));
        }

        errors.extend(
            self.availability
                .problems()
                .into_iter()
                .map(|problem| FieldError::new(problem.field_path(), problem.to_string())),
        );

        errors
    }

    pub fn validate(self, policy: &SchedulingPolicy) -> Result<Self, Vec<FieldError>> {
        let draft = self.normalized();
        let errors = draft.field_errors(policy);
        if errors.is_empty() { Ok(draft) } else { Err(errors) }
    }
}
