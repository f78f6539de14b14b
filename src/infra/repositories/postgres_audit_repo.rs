use crate::domain::{models::audit::AuditEntry, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAuditRepo {
    pool: PgPool,
}

impl PostgresAuditRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepo {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, actor_id, action, entity_type, entity_id, changes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
            .bind(&entry.id).bind(&entry.actor_id).bind(&entry.action).bind(&entry.entity_type)
            .bind(&entry.entity_id).bind(&entry.changes).bind(entry.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
