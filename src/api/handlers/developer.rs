use crate::api::dtos::{
    requests::{CreateDeveloperRequest, UpdateDeveloperRequest},
    responses::{SlotDto, SlotsResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::booking::BookedSlot;
use crate::domain::models::developer::{
    validate_wallet_address, DeveloperProfile, NewDeveloperParams, WeeklyAvailability,
};
use crate::domain::services::scheduling::{
    compute_available_slots, CandidateSlot, MAX_DURATION_HOURS, MIN_DURATION_HOURS,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateDeveloperRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.hourly_rate <= 0.0 {
        return Err(AppError::Validation("Hourly rate must be positive".into()));
    }
    if let Some(ref address) = payload.wallet_address {
        validate_wallet_address(address)?;
    }
    let availability = payload.availability.unwrap_or_default();
    availability.validate()?;

    if state.developer_repo.find_by_user(&user.user_id).await?.is_some() {
        return Err(AppError::Conflict("Profile already exists for this user".into()));
    }

    let profile = DeveloperProfile::new(NewDeveloperParams {
        user_id: user.user_id.clone(),
        display_name: payload.display_name,
        headline: payload.headline.unwrap_or_default(),
        bio: payload.bio.unwrap_or_default(),
        skills: payload.skills.unwrap_or_default(),
        hourly_rate: payload.hourly_rate,
        wallet_address: payload.wallet_address,
        avatar_url: payload.avatar_url.unwrap_or_default(),
        availability,
    });

    let created = state.developer_repo.create(&profile).await?;
    info!("Developer profile created: {} for user {}", created.id, user.user_id);
    Ok(Json(created))
}

pub async fn list_developers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let developers = state.developer_repo.list().await?;
    Ok(Json(developers))
}

pub async fn get_developer(
    State(state): State<Arc<AppState>>,
    Path(developer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let developer = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;
    Ok(Json(developer))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(developer_id): Path<String>,
    Json(payload): Json<UpdateDeveloperRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut profile = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    if profile.user_id != user.user_id {
        return Err(AppError::Forbidden("Not the profile owner".into()));
    }

    if let Some(val) = payload.display_name { profile.display_name = val; }
    if let Some(val) = payload.headline { profile.headline = val; }
    if let Some(val) = payload.bio { profile.bio = val; }
    if let Some(val) = payload.skills { profile.skills = val; }
    if let Some(val) = payload.hourly_rate {
        if val <= 0.0 {
            return Err(AppError::Validation("Hourly rate must be positive".into()));
        }
        profile.hourly_rate = val;
    }
    if let Some(val) = payload.wallet_address {
        validate_wallet_address(&val)?;
        profile.wallet_address = Some(val);
    }
    if let Some(val) = payload.avatar_url { profile.avatar_url = val; }

    let updated = state.developer_repo.update(&profile).await?;
    info!("Developer profile updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(developer_id): Path<String>,
    Json(payload): Json<WeeklyAvailability>,
) -> Result<impl IntoResponse, AppError> {
    let mut profile = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    if profile.user_id != user.user_id {
        return Err(AppError::Forbidden("Not the profile owner".into()));
    }

    payload.validate()?;
    profile.availability_json =
        serde_json::to_string(&payload).map_err(|_| AppError::Validation("Invalid availability".into()))?;

    let updated = state.developer_repo.update(&profile).await?;
    info!("Availability updated for developer {}", updated.id);
    Ok(Json(updated))
}

/// Widest span the calendar UI ever asks for is three months.
const MAX_DATE_RANGE_DAYS: i64 = 90;

fn parse_duration(params: &HashMap<String, String>) -> Result<u32, AppError> {
    let duration = match params.get("duration") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| AppError::Validation("Invalid duration".into()))?,
        None => MIN_DURATION_HOURS,
    };
    if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&duration) {
        return Err(AppError::Validation(format!(
            "Duration must be between {} and {} hours",
            MIN_DURATION_HOURS, MAX_DURATION_HOURS
        )));
    }
    Ok(duration)
}

/// Fresh bookings read for the date, then slot computation. The read always
/// happens first so new bookings are reflected in the same response.
async fn slots_for_date(
    state: &AppState,
    developer: &DeveloperProfile,
    date: NaiveDate,
    duration: u32,
    now: DateTime<Utc>,
) -> Result<Vec<CandidateSlot>, AppError> {
    let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let day_end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

    let bookings = state
        .booking_repo
        .list_by_range(&developer.id, day_start, day_end)
        .await?;
    let booked: Vec<BookedSlot> = bookings.iter().map(BookedSlot::from_booking).collect();

    let template = developer.availability();
    let Some(day) = template.for_weekday(date.weekday()) else {
        return Ok(Vec::new());
    };

    Ok(compute_available_slots(date, day, duration, &booked, now))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(developer_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let developer = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    let date_str = params.get("date").ok_or(AppError::Validation("Date required".into()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let duration = parse_duration(&params)?;

    let slots = slots_for_date(&state, &developer, date, duration, Utc::now()).await?;

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        duration_hours: duration,
        slots: slots
            .iter()
            .map(|s| SlotDto {
                start: s.start.format("%H:%M").to_string(),
                end: s.end.format("%H:%M").to_string(),
            })
            .collect(),
    }))
}

pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    Path(developer_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let developer = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start_date = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end_date = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end".into()))?;
    let duration = parse_duration(&params)?;

    // One bookings query per day; keep the range bounded.
    let span_days = (end_date - start_date).num_days();
    if span_days < 0 {
        return Err(AppError::Validation("start must not be after end".into()));
    }
    if span_days > MAX_DATE_RANGE_DAYS {
        return Err(AppError::Validation(format!(
            "Date range must not exceed {} days",
            MAX_DATE_RANGE_DAYS
        )));
    }

    let now = Utc::now();
    let mut available_dates = Vec::new();
    let mut current_date = start_date;

    while current_date <= end_date {
        let slots = slots_for_date(&state, &developer, current_date, duration, now).await?;
        if !slots.is_empty() {
            available_dates.push(current_date.to_string());
        }
        current_date += Duration::days(1);
    }

    Ok(Json(available_dates))
}
