use activity_booking_backend::{
    api::router::create_router,
    background::start_side_effect_worker,
    config::Config,
    domain::models::auth::Role,
    infra::factory::{assemble_state, Repositories},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

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
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: "test-secret".to_string(),
            auth_issuer: "test-issuer".to_string(),
            log_dir: "./logs".to_string(),
        };

        let (state, outbox) = assemble_state(&config, Repositories::sqlite(&pool));
        let state = Arc::new(state);

        tokio::spawn(start_side_effect_worker(
            state.notification_repo.clone(),
            state.audit_repo.clone(),
            outbox,
        ));

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state }
    }

    pub fn token(&self, user_id: &str, role: Role) -> String {
        self.state.session_service.issue_token(user_id, role).unwrap()
    }

    pub fn operator_token(&self, operator_id: &str) -> String {
        self.token(operator_id, Role::Operator)
    }

    pub fn traveler_token(&self, user_id: &str) -> String {
        self.token(user_id, Role::Traveler)
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(b) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(b.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Creates an activity owned by `operator_token`'s subject and returns its id.
    pub async fn create_activity(&self, operator_token: &str) -> String {
        let (status, body) = self.request(
            "POST", "/api/v1/activities", Some(operator_token),
            Some(json!({ "title": "Kayak Tour", "pricePerPerson": 45.0, "maxPeople": 12 })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "activity create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn set_windows(&self, operator_token: &str, activity_id: &str, windows: Value) -> (StatusCode, Value) {
        self.request("PUT", &format!("/api/v1/activities/{}/slots", activity_id), Some(operator_token), Some(windows)).await
    }

    pub async fn slots(&self, activity_id: &str, date: NaiveDate) -> Value {
        let (status, body) = self.request("GET", &format!("/api/v1/activities/{}/slots?date={}", activity_id, date), None, None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    pub async fn book(&self, token: Option<&str>, payload: Value) -> (StatusCode, Value) {
        self.request("POST", "/api/v1/bookings", token, Some(payload)).await
    }

    /// Polls until the worker has written `min` notifications for the caller.
    pub async fn wait_for_notifications(&self, token: &str, min: usize) -> Vec<Value> {
        for _ in 0..50 {
            let (_, body) = self.request("GET", "/api/v1/notifications", Some(token), None).await;
            let list = body.as_array().cloned().unwrap_or_default();
            if list.len() >= min {
                return list;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("expected at least {} notifications", min);
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
pub fn next_weekday(weekday: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}
