use crate::domain::{models::schedule::{AvailabilityWindow, BlockedDate}, ports::ScheduleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{NaiveDate, NaiveTime};

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn list_windows(&self, activity_id: &str) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>(
            "SELECT * FROM availability_windows WHERE activity_id = ? ORDER BY day_of_week ASC, start_time ASC"
        )
            .bind(activity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_windows_for_day(&self, activity_id: &str, day_of_week: i32) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>(
            "SELECT * FROM availability_windows WHERE activity_id = ? AND day_of_week = ? AND is_active = 1 ORDER BY start_time ASC"
        )
            .bind(activity_id)
            .bind(day_of_week)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active_windows(&self, activity_id: &str, day_of_week: i32, start_time: NaiveTime) -> Result<Vec<AvailabilityWindow>, AppError> {
        sqlx::query_as::<_, AvailabilityWindow>(
            "SELECT * FROM availability_windows
             WHERE activity_id = ? AND day_of_week = ? AND start_time = ? AND is_active = 1
             ORDER BY created_at ASC, id ASC"
        )
            .bind(activity_id)
            .bind(day_of_week)
            .bind(start_time)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_available_days(&self, activity_id: &str) -> Result<Vec<i32>, AppError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT day_of_week FROM availability_windows WHERE activity_id = ? AND is_active = 1 ORDER BY day_of_week ASC"
        )
            .bind(activity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn replace_windows(&self, activity_id: &str, windows: &[AvailabilityWindow]) -> Result<Vec<AvailabilityWindow>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM availability_windows WHERE activity_id = ?")
            .bind(activity_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut saved = Vec::with_capacity(windows.len());
        for w in windows {
            let row = sqlx::query_as::<_, AvailabilityWindow>(
                "INSERT INTO availability_windows (id, activity_id, day_of_week, start_time, end_time, capacity, is_active, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING *"
            )
                .bind(&w.id).bind(activity_id).bind(w.day_of_week).bind(w.start_time)
                .bind(w.end_time).bind(w.capacity).bind(w.is_active).bind(w.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            saved.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn upsert_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            r#"INSERT INTO blocked_dates (id, activity_id, blocked_date, reason, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(activity_id, blocked_date) DO UPDATE SET
               reason=excluded.reason
               RETURNING *"#
        )
            .bind(&blocked.id)
            .bind(&blocked.activity_id)
            .bind(blocked.blocked_date)
            .bind(&blocked.reason)
            .bind(blocked.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_blocked_date(&self, activity_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM blocked_dates WHERE activity_id = ? AND blocked_date = ?")
            .bind(activity_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Blocked date not found".into()));
        }
        Ok(())
    }

    async fn is_blocked(&self, activity_id: &str, date: NaiveDate) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blocked_dates WHERE activity_id = ? AND blocked_date = ?")
            .bind(activity_id)
            .bind(date)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count > 0)
    }

    async fn list_blocked_from(&self, activity_id: &str, from: NaiveDate) -> Result<Vec<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "SELECT * FROM blocked_dates WHERE activity_id = ? AND blocked_date >= ? ORDER BY blocked_date ASC"
        )
            .bind(activity_id)
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
