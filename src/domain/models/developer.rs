use crate::error::AppError;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookable window within a day, times as "HH:MM" on a 24h clock.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn parse(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;
        Some((start, end))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DayAvailability {
    pub is_available: bool,
    pub slots: Vec<TimeRange>,
}

/// Recurring weekly pattern of bookable windows, stored as a JSON
/// document on the developer profile.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeeklyAvailability {
    pub monday: Option<DayAvailability>,
    pub tuesday: Option<DayAvailability>,
    pub wednesday: Option<DayAvailability>,
    pub thursday: Option<DayAvailability>,
    pub friday: Option<DayAvailability>,
    pub saturday: Option<DayAvailability>,
    pub sunday: Option<DayAvailability>,
}

impl WeeklyAvailability {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayAvailability> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// Every listed range must be "HH:MM" with start strictly before end.
    pub fn validate(&self) -> Result<(), AppError> {
        let days = [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ];
        for (name, day) in days {
            let Some(day) = day else { continue };
            for range in &day.slots {
                let Some((start, end)) = range.parse() else {
                    return Err(AppError::Validation(format!(
                        "Invalid time range on {}: expected HH:MM",
                        name
                    )));
                };
                if start >= end {
                    return Err(AppError::Validation(format!(
                        "Invalid time range on {}: start must be before end",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct DeveloperProfile {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub headline: String,
    pub bio: String,
    pub skills: String,
    pub hourly_rate: f64,
    pub wallet_address: Option<String>,
    pub avatar_url: String,
    pub availability_json: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewDeveloperParams {
    pub user_id: String,
    pub display_name: String,
    pub headline: String,
    pub bio: String,
    pub skills: String,
    pub hourly_rate: f64,
    pub wallet_address: Option<String>,
    pub avatar_url: String,
    pub availability: WeeklyAvailability,
}

impl DeveloperProfile {
    pub fn new(params: NewDeveloperParams) -> Self {
        let availability_json =
            serde_json::to_string(&params.availability).unwrap_or_else(|_| "{}".to_string());
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            display_name: params.display_name,
            headline: params.headline,
            bio: params.bio,
            skills: params.skills,
            hourly_rate: params.hourly_rate,
            wallet_address: params.wallet_address,
            avatar_url: params.avatar_url,
            availability_json,
            created_at: Utc::now(),
        }
    }

    /// Unparseable or missing templates behave as "no availability".
    pub fn availability(&self) -> WeeklyAvailability {
        serde_json::from_str(&self.availability_json).unwrap_or_default()
    }
}

/// Wallet addresses are 0x-prefixed 20-byte hex strings.
pub fn validate_wallet_address(address: &str) -> Result<(), AppError> {
    let valid = address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::Validation("Malformed wallet address".into()));
    }
    Ok(())
}
