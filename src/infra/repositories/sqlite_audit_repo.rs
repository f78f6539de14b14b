use crate::domain::{models::audit::AuditEntry, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAuditRepo {
    pool: SqlitePool,
}

impl SqliteAuditRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for SqliteAuditRepo {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, actor_id, action, entity_type, entity_id, changes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.actor_id).bind(&entry.action).bind(&entry.entity_type)
            .bind(&entry.entity_id).bind(&entry.changes).bind(entry.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
