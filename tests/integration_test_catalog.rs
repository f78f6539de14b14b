mod common;

use axum::http::StatusCode;
use chrono::Weekday;
use common::{next_weekday, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_and_fetch_activity() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");

    let (status, created) = app.request("POST", "/api/v1/activities", Some(&op), Some(json!({
        "title": "Glacier Walk", "pricePerPerson": 80.0, "timezone": "Europe/Zurich"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["operatorId"], "op-1");
    assert_eq!(created["status"], "active");
    assert_eq!(created["timezone"], "Europe/Zurich");

    let (status, fetched) = app.request("GET", &format!("/api/v1/activities/{}", created["id"].as_str().unwrap()), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Glacier Walk");

    let (_, mine) = app.request("GET", "/api/v1/activities", Some(&op), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, _) = app.request("GET", "/api/v1/activities/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_validation_and_roles() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");

    let (status, _) = app.request("POST", "/api/v1/activities", Some(&op), Some(json!({
        "title": "Tour", "pricePerPerson": 10.0, "timezone": "Mars/Olympus"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("POST", "/api/v1/activities", Some(&op), Some(json!({
        "title": "Tour", "pricePerPerson": -5.0
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("POST", "/api/v1/activities", Some(&traveler), Some(json!({
        "title": "Tour", "pricePerPerson": 10.0
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_activity_cascades_schedule_but_keeps_bookings() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let other = app.operator_token("op-2");
    let activity_id = app.create_activity(&op).await;
    let monday = next_weekday(Weekday::Mon);

    app.set_windows(&op, &activity_id, json!([{ "dayOfWeek": 1, "startTime": "09:00" }])).await;
    app.request("POST", &format!("/api/v1/activities/{}/blocked-dates", activity_id), Some(&op),
        Some(json!({ "date": monday.to_string() }))).await;
    app.book(None, json!({
        "activityId": activity_id, "scheduledAt": (monday + chrono::Duration::days(7)).to_string(),
        "timeSlot": "09:00", "customerName": "Guest", "isGuest": true
    })).await;

    let uri = format!("/api/v1/activities/{}", activity_id);
    let (status, _) = app.request("DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &uri, Some(&op), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let windows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM availability_windows WHERE activity_id = ?")
        .bind(&activity_id).fetch_one(&app.pool).await.unwrap();
    let blocked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blocked_dates WHERE activity_id = ?")
        .bind(&activity_id).fetch_one(&app.pool).await.unwrap();
    let bookings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE activity_id = ?")
        .bind(&activity_id).fetch_one(&app.pool).await.unwrap();
    assert_eq!((windows, blocked, bookings), (0, 0, 1));
}

#[tokio::test]
async fn test_inactive_activity_rejects_bookings() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;
    let date = next_weekday(Weekday::Mon);

    app.set_windows(&op, &activity_id, json!([
        { "dayOfWeek": 1, "startTime": "09:00", "capacity": 4 }
    ])).await;

    sqlx::query("UPDATE activities SET status = 'archived' WHERE id = ?")
        .bind(&activity_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.book(None, json!({
        "activityId": activity_id, "scheduledAt": date.to_string(), "timeSlot": "09:00",
        "numPeople": 1, "customerName": "Guest", "isGuest": true
    })).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(app.slots(&activity_id, date).await["slots"][0]["booked"], 0);
}
