use crate::domain::models::developer::WeeklyAvailability;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateDeveloperRequest {
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub hourly_rate: f64,
    pub wallet_address: Option<String>,
    pub avatar_url: Option<String>,
    pub availability: Option<WeeklyAvailability>,
}

#[derive(Deserialize)]
pub struct UpdateDeveloperRequest {
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub hourly_rate: Option<f64>,
    pub wallet_address: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    /// "YYYY-MM-DD"
    pub date: String,
    /// Slot start, "HH:MM"
    pub start: String,
    pub duration_hours: u32,
    pub terms_accepted: bool,
    /// "normal" (default), "test", or "bypass"
    pub mode: Option<String>,
    pub wallet_address: Option<String>,
}
