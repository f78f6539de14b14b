use crate::domain::{models::notification::Notification, ports::NotificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepo {
    async fn create(&self, n: &Notification) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_type, recipient_id, kind, title, message, data, is_read, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        )
            .bind(&n.id).bind(&n.recipient_type).bind(&n.recipient_id).bind(&n.kind)
            .bind(&n.title).bind(&n.message).bind(&n.data).bind(n.is_read).bind(n.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_for_recipient(&self, recipient_type: &str, recipient_id: &str) -> Result<Vec<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_type = $1 AND recipient_id = $2 ORDER BY created_at DESC"
        )
            .bind(recipient_type).bind(recipient_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
