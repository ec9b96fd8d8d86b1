use crate::domain::{
    models::{booking::Booking, notification::Notification},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking, notifications: Vec<Notification>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, client_id, developer_id, session_start, session_end, duration_hours, total_cost, status, payment_status, room_id, transaction_hash, is_test_booking, payment_due, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.client_id).bind(&booking.developer_id)
            .bind(booking.session_start).bind(booking.session_end).bind(booking.duration_hours)
            .bind(booking.total_cost).bind(&booking.status).bind(&booking.payment_status)
            .bind(&booking.room_id).bind(&booking.transaction_hash).bind(booking.is_test_booking)
            .bind(booking.payment_due).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for n in notifications {
            sqlx::query("INSERT INTO notifications (id, developer_id, booking_id, kind, message, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(&n.id).bind(&n.developer_id).bind(&n.booking_id).bind(&n.kind).bind(&n.message).bind(&n.status).bind(n.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE client_id = ? ORDER BY session_start ASC").bind(client_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_developer(&self, developer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE developer_id = ? ORDER BY session_start ASC").bind(developer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, developer_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE developer_id = ? AND session_start < ? AND session_end > ? AND status != 'cancelled'").bind(developer_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError> {
        // Guarded in SQL so two racing transitions cannot both move the row.
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = ? WHERE id = ? AND status = 'confirmed' RETURNING *")
            .bind(status).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking is not confirmed".into()))
    }
    async fn find_payment_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = 'confirmed' AND payment_status = 'pending' AND payment_due IS NOT NULL AND payment_due <= ?"
        )
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
