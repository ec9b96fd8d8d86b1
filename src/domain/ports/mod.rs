use crate::domain::models::{
    booking::Booking, developer::DeveloperProfile, notification::Notification,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait DeveloperRepository: Send + Sync {
    async fn create(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<DeveloperProfile>, AppError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<DeveloperProfile>, AppError>;
    async fn list(&self) -> Result<Vec<DeveloperProfile>, AppError>;
    async fn update(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists the booking and any notifications in one transaction.
    async fn create(
        &self,
        booking: &Booking,
        notifications: Vec<Notification>,
    ) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_developer(&self, developer_id: &str) -> Result<Vec<Booking>, AppError>;
    /// Non-cancelled bookings intersecting `[start, end)` for a developer.
    async fn list_by_range(
        &self,
        developer_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError>;
    /// Moves a confirmed booking to `status`; any other current status is a
    /// conflict, enforced atomically in the store.
    async fn update_status(&self, id: &str, status: &str) -> Result<Booking, AppError>;
    /// Confirmed bookings whose deferred payment deadline has passed while
    /// payment is still pending.
    async fn find_payment_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Notification>, AppError>;
    async fn list_by_developer(&self, developer_id: &str) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, id: &str) -> Result<(), AppError>;
    async fn exists_for_booking(&self, booking_id: &str, kind: &str) -> Result<bool, AppError>;
}

/// Thin bridge to the crypto payment rail. Wallet connection happens in the
/// browser; the server only queries balances and submits transactions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<f64, AppError>;
    /// Estimates fees and submits a transfer, returning the transaction hash.
    async fn estimate_and_send(&self, to_address: &str, amount: f64) -> Result<String, AppError>;
}
