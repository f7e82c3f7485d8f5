use std::env;
use std::str::FromStr;
use chrono_tz::Tz;
use crate::domain::services::policy::SchedulingPolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String, // HS256 secret shared with the identity provider
    pub jwt_audience: String,
    pub timezone: Tz,
    pub policy: SchedulingPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = SchedulingPolicy::default();
        let policy = SchedulingPolicy {
            slot_granularity_minutes: env_or(
                "SLOT_GRANULARITY_MINUTES",
                defaults.slot_granularity_minutes,
            ),
            booking_window_days: env_or("BOOKING_WINDOW_DAYS", defaults.booking_window_days),
            conflict_buffer_minutes: env_or(
                "CONFLICT_BUFFER_MINUTES",
                defaults.conflict_buffer_minutes,
            ),
            duration_step_minutes: env_or("DURATION_STEP_MINUTES", defaults.duration_step_minutes),
            ..defaults
        };
        assert!(policy.slot_granularity_minutes > 0, "SLOT_GRANULARITY_MINUTES must be positive");
        assert!(policy.duration_step_minutes > 0, "DURATION_STEP_MINUTES must be positive");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set (identity provider HS256 secret)"),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".to_string()),
            timezone: env::var("SCHEDULE_TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse()
                .expect("SCHEDULE_TIMEZONE must be an IANA timezone name"),
            policy,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| panic!("{} must be a number", key)),
        Err(_) => default,
    }
}
