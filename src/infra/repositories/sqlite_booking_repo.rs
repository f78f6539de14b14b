use crate::domain::{
    models::{booking::{Admission, Booking, BookingStatus}, schedule::{SlotGuard, SlotUsage}},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "id, reference, activity_id, operator_id, user_id, is_guest, customer_name, customer_email, customer_phone, scheduled_at, booking_date, time_slot, num_people, price_per_person, total_price, status, payment_status, payment_method, notes, refusal_reason, cancellation_reason, created_at, updated_at";
const BOOKING_PARAMS: &str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

macro_rules! bind_booking {
    ($query:expr, $b:expr) => {
        $query
            .bind(&$b.id).bind(&$b.reference).bind(&$b.activity_id).bind(&$b.operator_id)
            .bind(&$b.user_id).bind($b.is_guest).bind(&$b.customer_name).bind(&$b.customer_email)
            .bind(&$b.customer_phone).bind($b.scheduled_at).bind($b.booking_date).bind(&$b.time_slot)
            .bind($b.num_people).bind($b.price_per_person).bind($b.total_price).bind(&$b.status)
            .bind(&$b.payment_status).bind(&$b.payment_method).bind(&$b.notes).bind(&$b.refusal_reason)
            .bind(&$b.cancellation_reason).bind($b.created_at).bind($b.updated_at)
    };
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let sql = format!("INSERT INTO bookings ({}) VALUES ({}) RETURNING *", BOOKING_COLUMNS, BOOKING_PARAMS);
        bind_booking!(sqlx::query_as::<_, Booking>(&sql), booking)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn admit(&self, booking: &Booking, guard: &SlotGuard) -> Result<Admission, AppError> {
        // One statement: SQLite runs writers one at a time, so the seat sum and
        // the insert cannot interleave with another admission.
        let sql = format!(
            "INSERT INTO bookings ({}) SELECT {}
             WHERE (SELECT COALESCE(SUM(num_people), 0) FROM bookings
                    WHERE activity_id = ? AND booking_date = ? AND time_slot = ?
                    AND status NOT IN ({})) + ? <= ?
             RETURNING *",
            BOOKING_COLUMNS, BOOKING_PARAMS, BookingStatus::released_sql_list()
        );

        let inserted = bind_booking!(sqlx::query_as::<_, Booking>(&sql), booking)
            .bind(&booking.activity_id).bind(booking.booking_date).bind(&booking.time_slot)
            .bind(booking.num_people).bind(guard.capacity)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        match inserted {
            Some(created) => Ok(Admission::Admitted(created)),
            None => {
                let slot = booking.time_slot.as_deref().unwrap_or_default();
                let booked = self.booked_seats(&booking.activity_id, booking.booking_date, slot).await?;
                Ok(Admission::Rejected { remaining: (guard.capacity as i64 - booked).max(0) })
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = ? ORDER BY scheduled_at DESC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_operator(&self, operator_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE operator_id = ? ORDER BY scheduled_at ASC").bind(operator_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn usage_by_slot(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<SlotUsage>, AppError> {
        let sql = format!(
            "SELECT time_slot, COALESCE(SUM(num_people), 0) AS booked FROM bookings
             WHERE activity_id = ? AND booking_date = ? AND time_slot IS NOT NULL
             AND status NOT IN ({})
             GROUP BY time_slot",
            BookingStatus::released_sql_list()
        );
        sqlx::query_as::<_, SlotUsage>(&sql)
            .bind(activity_id).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn booked_seats(&self, activity_id: &str, date: NaiveDate, time_slot: &str) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COALESCE(SUM(num_people), 0) FROM bookings
             WHERE activity_id = ? AND booking_date = ? AND time_slot = ?
             AND status NOT IN ({})",
            BookingStatus::released_sql_list()
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(activity_id).bind(date).bind(time_slot)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_lifecycle(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=?, payment_status=?, notes=?, refusal_reason=?, cancellation_reason=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&booking.status).bind(&booking.payment_status).bind(&booking.notes)
            .bind(&booking.refusal_reason).bind(&booking.cancellation_reason).bind(booking.updated_at)
            .bind(&booking.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }
}
