mod common;

use axum::http::StatusCode;
use chrono::Weekday;
use common::{next_weekday, TestApp};
use serde_json::{json, Value};

async fn pending_booking(app: &TestApp, op: &str, traveler: &str) -> String {
    let activity_id = app.create_activity(op).await;
    let date = next_weekday(Weekday::Mon);
    let (status, body) = app.book(Some(traveler), json!({
        "activityId": activity_id, "scheduledAt": date.to_string(), "customerName": "Ana", "status": "pending"
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["booking"]["id"].as_str().unwrap().to_string()
}

async fn patch_status(app: &TestApp, token: &str, booking_id: &str, body: Value) -> (StatusCode, Value) {
    app.request("PATCH", &format!("/api/v1/operator/bookings/{}/status", booking_id), Some(token), Some(body)).await
}

#[tokio::test]
async fn test_confirm_then_complete_notifies_traveler() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    let (status, body) = patch_status(&app, &op, &booking_id, json!({ "status": "confirmed", "paymentStatus": "partial" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["booking"]["status"], "confirmed");
    assert_eq!(body["booking"]["paymentStatus"], "partial");

    let notifications = app.wait_for_notifications(&traveler, 1).await;
    assert_eq!(notifications[0]["kind"], "booking_confirmed");
    assert_eq!(notifications[0]["recipientType"], "user");

    let (status, body) = patch_status(&app, &op, &booking_id, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "completed");

    let notifications = app.wait_for_notifications(&traveler, 2).await;
    assert!(notifications.iter().any(|n| n["kind"] == "booking_completed"));
}

#[tokio::test]
async fn test_refusal_requires_reason() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    let (status, _) = patch_status(&app, &op, &booking_id, json!({ "status": "refused" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = patch_status(&app, &op, &booking_id, json!({ "status": "refused", "reason": "Fully booked boat" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["refusalReason"], "Fully booked boat");

    let notifications = app.wait_for_notifications(&traveler, 1).await;
    assert_eq!(notifications[0]["kind"], "booking_refused");
    assert!(notifications[0]["message"].as_str().unwrap().contains("Fully booked boat"));
}

#[tokio::test]
async fn test_terminal_states_reject_transitions() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    patch_status(&app, &op, &booking_id, json!({ "status": "cancelled" })).await;

    let (status, _) = patch_status(&app, &op, &booking_id, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Payment and notes stay editable on a terminal booking
    let (status, body) = patch_status(&app, &op, &booking_id, json!({ "paymentStatus": "refunded", "notes": "Refund issued" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "cancelled");
    assert_eq!(body["booking"]["paymentStatus"], "refunded");
    assert_eq!(body["booking"]["notes"], "Refund issued");
}

#[tokio::test]
async fn test_unknown_status_values_are_rejected() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    let (status, _) = patch_status(&app, &op, &booking_id, json!({ "status": "archived" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = patch_status(&app, &op, &booking_id, json!({ "paymentStatus": "free" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_booking_operator_may_update() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let other_op = app.operator_token("op-2");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    let (status, _) = patch_status(&app, &other_op, &booking_id, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = patch_status(&app, &traveler, &booking_id, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = patch_status(&app, &op, "missing-booking", json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Legacy bookings carry no operator
    let (_, body) = app.book(Some(&traveler), json!({
        "activityId": "legacy-1", "scheduledAt": "2030-01-01", "customerName": "Ana"
    })).await;
    let legacy_id = body["booking"]["id"].as_str().unwrap();
    let (status, _) = patch_status(&app, &op, legacy_id, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lifecycle_changes_are_audited() {
    let app = TestApp::new().await;
    let op = app.operator_token("op-1");
    let traveler = app.traveler_token("traveler-1");
    let booking_id = pending_booking(&app, &op, &traveler).await;

    patch_status(&app, &op, &booking_id, json!({ "status": "confirmed" })).await;

    let mut actions: Vec<String> = Vec::new();
    for _ in 0..50 {
        actions = sqlx::query_scalar("SELECT action FROM audit_logs WHERE entity_id = ? ORDER BY created_at ASC")
            .bind(&booking_id)
            .fetch_all(&app.pool)
            .await
            .unwrap();
        if actions.len() >= 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(actions, vec!["create".to_string(), "update_status".to_string()]);
}
