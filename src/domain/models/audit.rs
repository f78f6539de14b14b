use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub actor_id: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub changes: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(actor_id: Option<String>, action: &str, entity_type: &str, entity_id: String, changes: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            actor_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            changes: Json(changes),
            created_at: Utc::now(),
        }
    }
}
