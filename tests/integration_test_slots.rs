mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use common::{event_type_payload, token_for, weekdays_only, TestApp};
use serde_json::Value;

fn window_weekdays() -> Vec<NaiveDate> {
    let today = Utc::now().date_naive();
    (1..=14)
        .map(|offset| today.checked_add_days(Days::new(offset)).unwrap())
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

fn times(day: &Value) -> Vec<&str> {
    day["slots"].as_array().unwrap()
        .iter()
        .map(|slot| slot["time"].as_str().unwrap())
        .collect()
}

fn slot<'a>(day: &'a Value, time: &str) -> &'a Value {
    day["slots"].as_array().unwrap()
        .iter()
        .find(|slot| slot["time"] == time)
        .unwrap()
}

#[tokio::test]
async fn test_weekday_morning_slots_over_rolling_window() {
    let app = TestApp::new().await;
    let token = token_for("owner-1", "owner@example.com");
    let id = app
        .create_event_type(
            &token,
            event_type_payload("Intro call", 30, weekdays_only("08:00", "12:00")),
        )
        .await;

    let (status, body) = app
        .send("GET", &format!("/event-slots?event_type_id={}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let data = &body["data"];
    assert_eq!(data["event_type"]["title"], "Intro call");
    assert_eq!(data["event_type"]["duration_minutes"], 30);
    assert_eq!(data["timezone"], "UTC");

    let dates = data["dates"].as_array().unwrap();
    let expected: Vec<String> = window_weekdays()
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let returned: Vec<&str> = dates.iter().map(|d| d["date"].as_str().unwrap()).collect();
    assert_eq!(returned, expected);

    for day in dates {
        assert_eq!(
            times(day),
            vec!["08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
        assert!(day["slots"].as_array().unwrap().iter().all(|s| s["available"] == true));
    }

    let first = &dates[0]["slots"][0];
    let starts_at = first["starts_at"].as_str().unwrap();
    assert!(starts_at.starts_with(&format!("{}T08:00:00", expected[0])), "{}", starts_at);
}

#[tokio::test]
async fn test_booked_slot_is_flagged_unavailable() {
    let app = TestApp::new().await;
    let token = token_for("owner-1", "owner@example.com");
    let id = app
        .create_event_type(
            &token,
            event_type_payload("Intro call", 30, weekdays_only("08:00", "12:00")),
        )
        .await;

    let day = window_weekdays()[0];
    let (status, _) = app.book(&id, "guest@example.com", &format!("{}T09:00:00Z", day)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send("GET", &format!("/event-slots?event_type_id={}", id), None, None)
        .await;
    let first_day = &body["data"]["dates"][0];
    assert_eq!(first_day["date"], day.format("%Y-%m-%d").to_string());

    assert_eq!(slot(first_day, "09:00")["available"], false);
    // exactly one buffer away is not "closer than" the buffer
    assert_eq!(slot(first_day, "08:30")["available"], true);
    assert_eq!(slot(first_day, "09:30")["available"], true);

    let second_day = &body["data"]["dates"][1];
    assert_eq!(slot(second_day, "09:00")["available"], true);
}

#[tokio::test]
async fn test_display_flag_is_advisory_only() {
    let app = TestApp::new().await;
    let token = token_for("owner-1", "owner@example.com");
    let id = app
        .create_event_type(
            &token,
            event_type_payload("Long call", 45, weekdays_only("08:00", "12:00")),
        )
        .await;

    let day = window_weekdays()[0];
    app.book(&id, "guest@example.com", &format!("{}T09:00:00Z", day)).await;

    let (_, body) = app
        .send("GET", &format!("/event-slots?event_type_id={}", id), None, None)
        .await;
    let first_day = &body["data"]["dates"][0];
    assert_eq!(slot(first_day, "09:30")["available"], true);

    // admission still sees the 09:00-09:45 booking
    let (status, _) = app.book(&id, "other@example.com", &format!("{}T09:30:00Z", day)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tail_slot_uses_granularity() {
    let app = TestApp::new().await;
    let token = token_for("owner-1", "owner@example.com");
    let id = app
        .create_event_type(
            &token,
            event_type_payload("Long call", 60, weekdays_only("09:00", "10:30")),
        )
        .await;

    let (_, body) = app
        .send("GET", &format!("/event-slots?event_type_id={}", id), None, None)
        .await;
    let first_day = &body["data"]["dates"][0];
    assert_eq!(times(first_day), vec!["09:00", "09:30", "10:00"]);
}

#[tokio::test]
async fn test_slots_are_public_but_need_existing_event_type() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/event-slots?event_type_id=missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event type not found");

    let (status, _) = app.send("GET", "/event-slots", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_cors() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("OPTIONS")
            .uri("/event-bookings")
            .header("Origin", "https://calendar.example.com")
            .header("Access-Control-Request-Method", "POST")
            .header(
                "Access-Control-Request-Headers",
                "authorization, content-type, x-client-info, apikey",
            )
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
