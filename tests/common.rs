use event_booking::{
    api::{extractors::auth::Claims, router::create_router},
    config::Config,
    domain::services::policy::SchedulingPolicy,
    infra::factory::sqlite_state,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_AUDIENCE: &str = "authenticated";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: TEST_SECRET.to_string(),
            jwt_audience: TEST_AUDIENCE.to_string(),
            timezone: chrono_tz::UTC,
            policy: SchedulingPolicy::default(),
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, optionally with a bearer token, and returns the
    /// status with the decoded body (`Null` for an empty body).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Creates an event type owned by `token`'s user and returns its id.
    pub async fn create_event_type(&self, token: &str, payload: Value) -> String {
        let (status, body) = self.send("POST", "/event-types", Some(token), Some(payload)).await;
        assert_eq!(status, StatusCode::OK, "event type creation failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn book(
        &self,
        event_type_id: &str,
        email: &str,
        scheduled_for: &str,
    ) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/event-bookings",
            None,
            Some(json!({
                "event_type_id": event_type_id,
                "user_email": email,
                "scheduled_for": scheduled_for,
            })),
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn token_for(user_id: &str, email: &str) -> String {
    token_with(user_id, email, TEST_SECRET, TEST_AUDIENCE, 3600)
}

#[allow(dead_code)]
pub fn token_with(
    user_id: &str,
    email: &str,
    secret: &str,
    audience: &str,
    ttl_secs: i64,
) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(email.to_string()),
        aud: audience.to_string(),
        exp: (chrono::Utc::now().timestamp() + ttl_secs) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

/// Monday to Friday open between `start` and `end`, weekend closed.
#[allow(dead_code)]
pub fn weekdays_only(start: &str, end: &str) -> Value {
    let open = json!({ "enabled": true, "start_time": start, "end_time": end });
    let closed = json!({ "enabled": false, "start_time": "10:00", "end_time": "13:00" });
    json!({
        "sunday": closed,
        "monday": open,
        "tuesday": open,
        "wednesday": open,
        "thursday": open,
        "friday": open,
        "saturday": closed,
    })
}

#[allow(dead_code)]
pub fn event_type_payload(title: &str, duration_minutes: i32, availability: Value) -> Value {
    json!({
        "title": title,
        "description": "A short call",
        "duration_minutes": duration_minutes,
        "availability": availability,
    })
}
