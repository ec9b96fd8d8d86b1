use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const KIND_SESSION_STARTED: &str = "SESSION_STARTED";
pub const KIND_PAYMENT_DUE: &str = "PAYMENT_DUE";

pub const STATUS_UNREAD: &str = "UNREAD";
pub const STATUS_READ: &str = "READ";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub developer_id: String,
    pub booking_id: String,
    pub kind: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(developer_id: String, booking_id: String, kind: &str, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            developer_id,
            booking_id,
            kind: kind.to_string(),
            message,
            status: STATUS_UNREAD.to_string(),
            created_at: Utc::now(),
        }
    }
}
