use activity_booking_backend::domain::models::auth::Role;
use activity_booking_backend::domain::services::session_service::SessionService;
use chrono::{Datelike, Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const SLOT_CAPACITY: i32 = 5;
const SLOT_LABEL: &str = "10:00";

enum Outcome {
    Admitted,
    Rejected,
    Failed,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let base_url = env::var("PROBE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set to mint probe tokens");
    let issuer = env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.activity-booking.local".to_string());
    let requests: u32 = env::var("PROBE_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(200);
    let rps: u32 = env::var("PROBE_RPS").ok().and_then(|v| v.parse().ok()).unwrap_or(500);

    println!("{}", "🚀 Starting overbooking probe".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    let sessions = SessionService::from_secret(secret.as_bytes(), issuer);
    let operator_token = sessions.issue_token(&format!("probe-op-{}", Uuid::new_v4()), Role::Operator)
        .expect("Failed to mint operator token");
    let traveler_token = sessions.issue_token(&format!("probe-traveler-{}", Uuid::new_v4()), Role::Traveler)
        .expect("Failed to mint traveler token");

    println!("\n{}", "⚙️  Setting up probe activity...".yellow());
    let date = Utc::now().date_naive() + ChronoDuration::days(1);
    let activity_id = setup_activity(&client, &base_url, &operator_token, date.weekday().number_from_monday() as i32).await;
    println!("{}", "✅ Activity created.".green());
    println!("   Activity: {}", activity_id);
    println!("   Slot:     {} {} (capacity {})", date, SLOT_LABEL, SLOT_CAPACITY);

    let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).expect("rps is at least 1")));
    let (tx, mut rx) = mpsc::channel(requests.max(1) as usize);
    let payload = Arc::new(json!({
        "activityId": activity_id,
        "scheduledAt": date.to_string(),
        "timeSlot": SLOT_LABEL,
        "numPeople": 1,
        "customerName": "Probe"
    }));
    let url = Arc::new(format!("{}/api/v1/bookings", base_url));
    let token = Arc::new(traveler_token);

    let started = Instant::now();
    let mut sent = 0;
    while sent < requests {
        if limiter.check().is_err() {
            tokio::task::yield_now().await;
            continue;
        }
        sent += 1;

        let client = client.clone();
        let url = url.clone();
        let payload = payload.clone();
        let token = token.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let req_start = Instant::now();
            let res = client.post(url.as_str()).bearer_auth(token.as_str()).json(payload.as_ref()).send().await;
            let latency = req_start.elapsed();

            let outcome = match res {
                Ok(r) if r.status() == StatusCode::CREATED => Outcome::Admitted,
                Ok(r) if r.status() == StatusCode::BAD_REQUEST => Outcome::Rejected,
                _ => Outcome::Failed,
            };
            let _ = tx.send((latency, outcome)).await;
        });
    }
    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let (mut admitted, mut rejected, mut failed) = (0, 0, 0);
    while let Some((latency, outcome)) = rx.recv().await {
        match outcome {
            Outcome::Admitted => admitted += 1,
            Outcome::Rejected => rejected += 1,
            Outcome::Failed => failed += 1,
        }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    println!("\n{}", "=".repeat(60));
    println!("{:<10} | {:<10} | {:<10} | {:<10} | {:<10}", "Sent", "Admitted", "Rejected", "Failed", "P99 (ms)");
    println!("{:-<10}-+-{:-<10}-+-{:-<10}-+-{:-<10}-+-{:-<10}", "", "", "", "", "");
    println!(
        "{:<10} | {:<10} | {:<10} | {:<10} | {:<10.2}",
        sent, admitted, rejected, failed,
        histogram.value_at_quantile(0.99) as f64 / 1000.0
    );
    println!("Mean latency: {:.2} ms over {:.1}s", histogram.mean() / 1000.0, started.elapsed().as_secs_f64());

    let booked = fetch_booked(&client, &base_url, &activity_id, &date.to_string()).await;
    if admitted > SLOT_CAPACITY || booked > SLOT_CAPACITY as i64 {
        println!("{}", format!("❌ OVERBOOKED: {} seats held against capacity {}", booked, SLOT_CAPACITY).red().bold());
        std::process::exit(1);
    }
    println!("{}", format!("✅ Capacity held: {} of {} seats booked", booked, SLOT_CAPACITY).green().bold());
}

async fn setup_activity(client: &Client, base_url: &str, operator_token: &str, day_of_week: i32) -> String {
    let res = client.post(format!("{}/api/v1/activities", base_url))
        .bearer_auth(operator_token)
        .json(&json!({ "title": "Overbook Probe", "pricePerPerson": 10.0 }))
        .send()
        .await
        .expect("Failed to send activity create request");

    if !res.status().is_success() {
        panic!("Failed to create activity: status {}", res.status());
    }
    let body: Value = res.json().await.expect("Failed to parse activity response");
    let activity_id = body["id"].as_str().expect("No activity id").to_string();

    let res = client.put(format!("{}/api/v1/activities/{}/slots", base_url, activity_id))
        .bearer_auth(operator_token)
        .json(&json!([{ "dayOfWeek": day_of_week, "startTime": SLOT_LABEL, "endTime": "12:00", "capacity": SLOT_CAPACITY }]))
        .send()
        .await
        .expect("Failed to send window replace request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to configure window. Status: {}. Body: {}", status, txt);
    }
    activity_id
}

async fn fetch_booked(client: &Client, base_url: &str, activity_id: &str, date: &str) -> i64 {
    let body: Value = client.get(format!("{}/api/v1/activities/{}/slots?date={}", base_url, activity_id, date))
        .send()
        .await
        .expect("Failed to fetch slots")
        .json()
        .await
        .expect("Failed to parse slots response");

    body["slots"].as_array()
        .and_then(|slots| slots.iter().find(|s| s["startTime"] == SLOT_LABEL))
        .and_then(|s| s["booked"].as_i64())
        .unwrap_or(0)
}
