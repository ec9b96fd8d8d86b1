use crate::domain::models::booking::Booking;
use crate::domain::services::booking_flow::LiveSession;
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotDto {
    pub start: String,
    pub end: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub duration_hours: u32,
    pub slots: Vec<SlotDto>,
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    /// Set when the session is immediately joinable; `None` means a
    /// deferred confirmation with payment due at session start.
    pub session: Option<LiveSession>,
}

#[derive(Serialize)]
pub struct JoinStatusResponse {
    pub joinable: bool,
    pub room_id: String,
    pub join_url: Option<String>,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
}
