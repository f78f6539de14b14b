use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Date {0} is blocked for this activity")]
    DateBlocked(NaiveDate),
    #[error("Slot is full")]
    SlotFull { remaining: i64 },
    #[error("Only {remaining} seats left, {requested} requested")]
    InsufficientCapacity { remaining: i64, requested: i32 },
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Maps a failed seat check onto the two capacity errors callers see.
    pub fn capacity(remaining: i64, requested: i32) -> Self {
        if remaining <= 0 {
            AppError::SlotFull { remaining: 0 }
        } else {
            AppError::InsufficientCapacity { remaining, requested }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DateBlocked(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::SlotFull { remaining } | AppError::InsufficientCapacity { remaining, .. } => {
                let kind = if matches!(self, AppError::SlotFull { .. }) { "slot_full" } else { "insufficient_capacity" };
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": self.to_string(), "code": kind, "remaining": remaining }))
                ).into_response();
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
