use crate::domain::models::booking::BookedSlot;
use crate::domain::models::developer::DayAvailability;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

pub const MIN_DURATION_HOURS: u32 = 1;
pub const MAX_DURATION_HOURS: u32 = 4;

/// A possible new booking start, derived fresh on every computation and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl CandidateSlot {
    /// Half-open interval intersection: touching endpoints do not conflict.
    pub fn overlaps(&self, booked: &BookedSlot) -> bool {
        self.start < booked.end && self.end > booked.start
    }
}

/// Computes the bookable start times for one day.
///
/// The day's first slot entry bounds the available window; bookings are
/// offered at whole hours. When `date` is the current day, slots starting
/// in the current hour or earlier are never offered: the minimum start is
/// rounded up to the next hour boundary regardless of minutes remaining.
/// A day without slot entries yields no availability rather than an error.
pub fn compute_available_slots(
    date: NaiveDate,
    day: &DayAvailability,
    duration_hours: u32,
    existing: &[BookedSlot],
    now: DateTime<Utc>,
) -> Vec<CandidateSlot> {
    if !day.is_available || duration_hours == 0 {
        return Vec::new();
    }
    let Some(window) = day.slots.first() else {
        return Vec::new();
    };
    let Some((open, close)) = window.parse() else {
        return Vec::new();
    };

    let start_hour = open.hour();
    let end_hour = close.hour();

    let minimum_hour = if date == now.date_naive() {
        start_hour.max(now.hour() + 1)
    } else {
        start_hour
    };

    let mut candidates = Vec::new();
    let mut hour = minimum_hour;
    while hour + duration_hours <= end_hour {
        if let (Some(start), Some(end)) = (
            NaiveTime::from_hms_opt(hour, 0, 0),
            NaiveTime::from_hms_opt(hour + duration_hours, 0, 0),
        ) {
            let candidate = CandidateSlot { start, end };
            if !existing.iter().any(|booked| candidate.overlaps(booked)) {
                candidates.push(candidate);
            }
        }
        hour += 1;
    }
    candidates
}
