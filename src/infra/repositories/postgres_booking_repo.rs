use crate::domain::{
    models::{booking::Booking, notification::Notification},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking, notifications: Vec<Notification>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, client_id, developer_id, session_start, session_end, duration_hours, total_cost, status, payment_status, room_id, transaction_hash, is_test_booking, payment_due, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.client_id).bind(&booking.developer_id)
            .bind(booking.session_start).bind(booking.session_end).bind(booking.duration_hours)
            .bind(booking.total_cost).bind(&booking.status).bind(&booking.payment_status)
            .bind(&booking.room_id).bind(&booking.transaction_hash).bind(booking.is_test_booking)
            .bind(booking.payment_due).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for n in notifications {
            sqlx::query("INSERT INTO notifications (id, developer_id, booking_id, kind, message, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)")
                .bind(&n.id).bind(&n.developer_id).bind(&n.booking_id).bind(&n.kind).bind(&n.message).bind(&n.status).bind(n.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE client_id = $1 ORDER BY session_start ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_developer(&self, developer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE developer_id = $1 ORDER BY session_start ASC").bind(developer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, developer_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE developer_id = $1 AND session_start < $2 AND session_end > $3 AND status != 'cancelled'").bind(developer_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError> {
        // Guarded in SQL so two racing transitions cannot both move the row.
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1 WHERE id = $2 AND status = 'confirmed' RETURNING *")
            .bind(status).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking is not confirmed".into()))
    }
    async fn find_payment_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = 'confirmed' AND payment_status = 'pending' AND payment_due IS NOT NULL AND payment_due <= $1"
        )
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
