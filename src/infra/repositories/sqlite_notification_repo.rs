use crate::domain::{models::notification::Notification, ports::NotificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteNotificationRepo {
    pool: SqlitePool,
}

impl SqliteNotificationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepo {
    async fn create(&self, n: &Notification) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_type, recipient_id, kind, title, message, data, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&n.id).bind(&n.recipient_type).bind(&n.recipient_id).bind(&n.kind)
            .bind(&n.title).bind(&n.message).bind(&n.data).bind(n.is_read).bind(n.created_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_for_recipient(&self, recipient_type: &str, recipient_id: &str) -> Result<Vec<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_type = ? AND recipient_id = ? ORDER BY created_at DESC"
        )
            .bind(recipient_type).bind(recipient_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
