mod common;

use axum::http::StatusCode;
use chrono::{Duration, Weekday};
use common::{next_weekday, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_blocked_date_overrides_window() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;
    let monday = next_weekday(Weekday::Mon);

    app.set_windows(&op, &activity_id, json!([
        { "dayOfWeek": 1, "startTime": "09:00", "endTime": "17:00", "capacity": 10 }
    ])).await;
    assert_eq!(app.slots(&activity_id, monday).await["slots"].as_array().unwrap().len(), 1);

    let (status, body) = app.request(
        "POST", &format!("/api/v1/activities/{}/blocked-dates", activity_id), Some(&op),
        Some(json!({ "date": monday.to_string(), "reason": "Maintenance" })),
    ).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let body = app.slots(&activity_id, monday).await;
    assert_eq!(body["blocked"], true);
    assert!(body["slots"].as_array().unwrap().is_empty());

    // Catalog bookings are refused on a blocked date
    let (status, _) = app.book(None, json!({
        "activityId": activity_id, "scheduledAt": monday.to_string(), "timeSlot": "09:00",
        "numPeople": 1, "customerName": "Guest", "isGuest": true
    })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The following Monday is unaffected
    let body = app.slots(&activity_id, monday + Duration::days(7)).await;
    assert_eq!(body["blocked"], false);
    assert_eq!(body["slots"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_block_is_upsert_and_unblock_restores_slots() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;
    let monday = next_weekday(Weekday::Mon);
    let uri = format!("/api/v1/activities/{}/blocked-dates", activity_id);

    app.set_windows(&op, &activity_id, json!([{ "dayOfWeek": 1, "startTime": "09:00" }])).await;

    app.request("POST", &uri, Some(&op), Some(json!({ "date": monday.to_string(), "reason": "first" }))).await;
    let (status, body) = app.request("POST", &uri, Some(&op), Some(json!({ "date": monday.to_string(), "reason": "second" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reason"], "second");

    let (_, days) = app.request("GET", &format!("/api/v1/activities/{}/available-days", activity_id), None, None).await;
    assert_eq!(days["blockedDates"], json!([monday.to_string()]));

    let (status, _) = app.request("DELETE", &uri, Some(&op), Some(json!({ "date": monday.to_string() }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.slots(&activity_id, monday).await["blocked"], false);

    let (status, _) = app.request("DELETE", &uri, Some(&op), Some(json!({ "date": monday.to_string() }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sunday_window_maps_to_day_seven() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;

    app.set_windows(&op, &activity_id, json!([
        { "dayOfWeek": 7, "startTime": "08:00", "endTime": "10:00", "capacity": 4 }
    ])).await;

    let sunday = next_weekday(Weekday::Sun);
    let body = app.slots(&activity_id, sunday).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["startTime"], "08:00");
    assert_eq!(slots[0]["endTime"], "10:00");
    assert_eq!(slots[0]["capacity"], 4);

    for offset in 1..7 {
        let other = sunday + Duration::days(offset);
        assert!(app.slots(&activity_id, other).await["slots"].as_array().unwrap().is_empty(), "{} should have no slots", other);
    }
}

#[tokio::test]
async fn test_slot_listing_is_idempotent() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;
    let date = next_weekday(Weekday::Thu);

    app.set_windows(&op, &activity_id, json!([
        { "dayOfWeek": 4, "startTime": "13:00", "endTime": "15:00", "capacity": 6 },
        { "dayOfWeek": 4, "startTime": "09:00", "endTime": "11:00", "capacity": 3 }
    ])).await;
    app.book(None, json!({
        "activityId": activity_id, "scheduledAt": date.to_string(), "timeSlot": "13:00",
        "numPeople": 2, "customerName": "Guest", "isGuest": true
    })).await;

    let first = app.slots(&activity_id, date).await;
    let second = app.slots(&activity_id, date).await;
    assert_eq!(first, second);

    let slots = first["slots"].as_array().unwrap();
    assert_eq!(slots[0]["startTime"], "09:00");
    assert_eq!(slots[1]["startTime"], "13:00");
    assert_eq!(slots[1]["remaining"], 4);
}

#[tokio::test]
async fn test_replace_with_empty_list_removes_availability() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;

    app.set_windows(&op, &activity_id, json!([
        { "dayOfWeek": 1, "startTime": "09:00" },
        { "dayOfWeek": 3, "startTime": "09:00" }
    ])).await;

    let (status, body) = app.set_windows(&op, &activity_id, json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    for weekday in [Weekday::Mon, Weekday::Wed] {
        assert!(app.slots(&activity_id, next_weekday(weekday)).await["slots"].as_array().unwrap().is_empty());
    }

    let (_, days) = app.request("GET", &format!("/api/v1/activities/{}/available-days", activity_id), None, None).await;
    assert_eq!(days["availableDays"], json!([]));
}

#[tokio::test]
async fn test_available_days_lists_active_weekdays() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;

    app.set_windows(&op, &activity_id, json!({ "slots": [
        { "dayOfWeek": 5, "startTime": "09:00" },
        { "dayOfWeek": 1, "startTime": "09:00" },
        { "dayOfWeek": 1, "startTime": "14:00" },
        { "dayOfWeek": 3, "startTime": "09:00", "isActive": false }
    ] })).await;

    let (status, days) = app.request("GET", &format!("/api/v1/activities/{}/available-days", activity_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days["availableDays"], json!([1, 5]));
    assert_eq!(days["blockedDates"], json!([]));

    // The operator view still shows the inactive window
    let (_, windows) = app.request("GET", &format!("/api/v1/activities/{}/windows", activity_id), Some(&op), None).await;
    assert_eq!(windows.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_activity_has_no_availability() {
    let app = TestApp::new().await;
    let (status, days) = app.request("GET", "/api/v1/activities/does-not-exist/available-days", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days["availableDays"], json!([]));
    assert_eq!(days["blockedDates"], json!([]));
}

#[tokio::test]
async fn test_window_validation() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let activity_id = app.create_activity(&op).await;

    let invalid = [
        json!([{ "dayOfWeek": 0, "startTime": "09:00" }]),
        json!([{ "dayOfWeek": 8, "startTime": "09:00" }]),
        json!([{ "dayOfWeek": 1, "startTime": "9am" }]),
        json!([{ "dayOfWeek": 1, "startTime": "10:00", "endTime": "09:00" }]),
        json!([{ "dayOfWeek": 1, "startTime": "10:00", "capacity": 0 }]),
    ];
    for windows in invalid {
        let (status, _) = app.set_windows(&op, &activity_id, windows.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", windows);
    }

    // A rejected replace leaves the previous set in place
    app.set_windows(&op, &activity_id, json!([{ "dayOfWeek": 2, "startTime": "09:00:30", "capacity": 3 }])).await;
    let (_, bad) = app.set_windows(&op, &activity_id, json!([{ "dayOfWeek": 9, "startTime": "09:00" }])).await;
    assert!(bad["error"].is_string());
    let (_, windows) = app.request("GET", &format!("/api/v1/activities/{}/windows", activity_id), Some(&op), None).await;
    let windows = windows.as_array().unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["startTime"], "09:00");
    assert_eq!(windows[0]["capacity"], 3);
}

#[tokio::test]
async fn test_only_owner_can_edit_schedule() {
    let app = TestApp::new().await;
    let owner = app.operator_token("op-1");
    let other = app.operator_token("op-2");
    let traveler = app.traveler_token("traveler-1");
    let activity_id = app.create_activity(&owner).await;

    let (status, _) = app.set_windows(&other, &activity_id, json!([])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.set_windows(&traveler, &activity_id, json!([])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("PUT", &format!("/api/v1/activities/{}/slots", activity_id), None, Some(json!([]))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
