use crate::domain::{
    models::{booking::{Admission, Booking, BookingStatus}, schedule::{SlotGuard, SlotUsage}},
    ports::BookingRepository,
};
use crate::domain::services::availability::check_admission;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use chrono::NaiveDate;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_BOOKING: &str = "INSERT INTO bookings (id, reference, activity_id, operator_id, user_id, is_guest, customer_name, customer_email, customer_phone, scheduled_at, booking_date, time_slot, num_people, price_per_person, total_price, status, payment_status, payment_method, notes, refusal_reason, cancellation_reason, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23) RETURNING *";

fn booked_seats_sql() -> String {
    format!(
        "SELECT COALESCE(SUM(num_people), 0) FROM bookings WHERE activity_id = $1 AND booking_date = $2 AND time_slot = $3 AND status NOT IN ({})",
        BookingStatus::released_sql_list()
    )
}

async fn insert(tx: &mut Transaction<'_, Postgres>, b: &Booking) -> Result<Booking, AppError> {
    sqlx::query_as::<_, Booking>(INSERT_BOOKING)
        .bind(&b.id).bind(&b.reference).bind(&b.activity_id).bind(&b.operator_id)
        .bind(&b.user_id).bind(b.is_guest).bind(&b.customer_name).bind(&b.customer_email)
        .bind(&b.customer_phone).bind(b.scheduled_at).bind(b.booking_date).bind(&b.time_slot)
        .bind(b.num_people).bind(b.price_per_person).bind(b.total_price).bind(&b.status)
        .bind(&b.payment_status).bind(&b.payment_method).bind(&b.notes).bind(&b.refusal_reason)
        .bind(&b.cancellation_reason).bind(b.created_at).bind(b.updated_at)
        .fetch_one(&mut **tx).await.map_err(AppError::Database)
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = insert(&mut tx, booking).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn admit(&self, booking: &Booking, guard: &SlotGuard) -> Result<Admission, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row locks on the slot's windows, taken in id order, serialize admissions into the same slot.
        let capacities: Vec<i32> = sqlx::query_scalar("SELECT capacity FROM availability_windows WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&guard.window_ids)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        // Windows replaced in the meantime: the booking no longer maps to a live window.
        if !capacities.is_empty() {
            let capacity: i32 = capacities.iter().sum();
            let booked: i64 = sqlx::query_scalar(&booked_seats_sql())
                .bind(&booking.activity_id).bind(booking.booking_date).bind(&booking.time_slot)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

            match check_admission(capacity, booked, booking.num_people) {
                Ok(_) => {}
                Err(AppError::SlotFull { remaining } | AppError::InsufficientCapacity { remaining, .. }) => {
                    tx.rollback().await.map_err(AppError::Database)?;
                    return Ok(Admission::Rejected { remaining });
                }
                Err(e) => return Err(e),
            }
        }

        let created = insert(&mut tx, booking).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(Admission::Admitted(created))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 ORDER BY scheduled_at DESC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_operator(&self, operator_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE operator_id = $1 ORDER BY scheduled_at ASC").bind(operator_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn usage_by_slot(&self, activity_id: &str, date: NaiveDate) -> Result<Vec<SlotUsage>, AppError> {
        let sql = format!("SELECT time_slot, COALESCE(SUM(num_people), 0) AS booked FROM bookings WHERE activity_id = $1 AND booking_date = $2 AND time_slot IS NOT NULL AND status NOT IN ({}) GROUP BY time_slot", BookingStatus::released_sql_list());
        sqlx::query_as::<_, SlotUsage>(&sql).bind(activity_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn booked_seats(&self, activity_id: &str, date: NaiveDate, time_slot: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&booked_seats_sql()).bind(activity_id).bind(date).bind(time_slot).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_lifecycle(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status=$1, payment_status=$2, notes=$3, refusal_reason=$4, cancellation_reason=$5, updated_at=$6 WHERE id=$7 RETURNING *").bind(&booking.status).bind(&booking.payment_status).bind(&booking.notes).bind(&booking.refusal_reason).bind(&booking.cancellation_reason).bind(booking.updated_at).bind(&booking.id).fetch_optional(&self.pool).await.map_err(AppError::Database)?.ok_or(AppError::NotFound("Booking not found".into()))
    }
}
