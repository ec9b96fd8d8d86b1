use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_COMPLETED: &str = "completed";

/// How the payment decision table is driven. Exhaustive by construction:
/// test and bypass bookings never touch the payment rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingMode {
    Normal,
    Test,
    Bypass,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub developer_id: String,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub duration_hours: i32,
    pub total_cost: f64,
    pub status: String,
    pub payment_status: String,
    pub room_id: String,
    pub transaction_hash: Option<String>,
    pub is_test_booking: bool,
    pub payment_due: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub client_id: String,
    pub developer_id: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration_hours: u32,
    pub total_cost: f64,
    pub payment_status: String,
    pub transaction_hash: Option<String>,
    pub is_test_booking: bool,
    pub payment_due: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let session_start = params.date.and_time(params.start).and_utc();
        let session_end = session_start + Duration::hours(params.duration_hours as i64);

        // Collision-resistant id: creation instant plus the creating identity.
        let id = format!("{}-{}", params.now.timestamp_millis(), params.client_id);
        let room_id = derive_room_id(&id);

        Self {
            id,
            client_id: params.client_id,
            developer_id: params.developer_id,
            session_start,
            session_end,
            duration_hours: params.duration_hours as i32,
            total_cost: params.total_cost,
            status: STATUS_CONFIRMED.to_string(),
            payment_status: params.payment_status,
            room_id,
            transaction_hash: params.transaction_hash,
            is_test_booking: params.is_test_booking,
            payment_due: params.payment_due,
            created_at: params.now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status == STATUS_COMPLETED || self.status == STATUS_CANCELLED
    }
}

fn derive_room_id(booking_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(booking_id.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("dm-{}", &digest[..12])
}

/// Conflict-check projection of a booking: the occupied interval on the
/// day being viewed. Recomputed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BookedSlot {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            start: booking.session_start.time(),
            end: booking.session_end.time(),
        }
    }
}
