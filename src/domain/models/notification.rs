use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_type: String, // "user" or "operator"
    pub recipient_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: Json<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_type: &str, recipient_id: String, kind: &str, title: String, message: String, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient_type: recipient_type.to_string(),
            recipient_id,
            kind: kind.to_string(),
            title,
            message,
            data: Json(data),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
