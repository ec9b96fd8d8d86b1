use crate::api::dtos::{requests::CreateBookingRequest, responses::BookingCreatedResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::booking::{
    BookingMode, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED,
};
use crate::domain::models::developer::validate_wallet_address;
use crate::domain::services::booking_flow::{submit_booking, BookingSubmission};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(developer_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let start = NaiveTime::parse_from_str(&payload.start, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;

    let mode = match payload.mode.as_deref() {
        None | Some("normal") => BookingMode::Normal,
        Some("test") => BookingMode::Test,
        Some("bypass") => BookingMode::Bypass,
        Some(other) => {
            return Err(AppError::Validation(format!("Unknown booking mode: {}", other)))
        }
    };

    if let Some(ref address) = payload.wallet_address {
        validate_wallet_address(address)?;
    }

    let outcome = submit_booking(
        &state,
        BookingSubmission {
            client_id: user.user_id,
            developer_id,
            date,
            start,
            duration_hours: payload.duration_hours,
            mode,
            terms_accepted: payload.terms_accepted,
            client_wallet: payload.wallet_address,
        },
        Utc::now(),
    )
    .await?;

    Ok(Json(BookingCreatedResponse {
        booking: outcome.booking,
        session: outcome.session,
    }))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_client(&user.user_id).await?;
    Ok(Json(bookings))
}

pub async fn list_developer_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(developer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let developer = state
        .developer_repo
        .find_by_id(&developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    if developer.user_id != user.user_id {
        return Err(AppError::Forbidden("Not the profile owner".into()));
    }

    let bookings = state.booking_repo.list_by_developer(&developer_id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    ensure_participant(&state, &booking.client_id, &booking.developer_id, &user.user_id).await?;
    Ok(Json(booking))
}

pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    transition_booking(&state, &booking_id, &user.user_id, STATUS_COMPLETED).await
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    transition_booking(&state, &booking_id, &user.user_id, STATUS_CANCELLED).await
}

/// Developer-dashboard transitions only. Completed and cancelled are
/// terminal; anything not confirmed cannot move.
async fn transition_booking(
    state: &AppState,
    booking_id: &str,
    user_id: &str,
    target: &str,
) -> Result<Json<crate::domain::models::booking::Booking>, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let developer = state
        .developer_repo
        .find_by_id(&booking.developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;
    if developer.user_id != user_id {
        return Err(AppError::Forbidden("Only the developer may change booking status".into()));
    }

    if booking.status != STATUS_CONFIRMED {
        return Err(AppError::Conflict(format!(
            "Booking is {}; only confirmed bookings can transition",
            booking.status
        )));
    }

    let updated = state.booking_repo.update_status(booking_id, target).await?;
    info!("Booking {} -> {}", updated.id, target);
    Ok(Json(updated))
}

async fn ensure_participant(
    state: &AppState,
    client_id: &str,
    developer_id: &str,
    user_id: &str,
) -> Result<(), AppError> {
    if client_id == user_id {
        return Ok(());
    }
    let developer = state
        .developer_repo
        .find_by_id(developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;
    if developer.user_id == user_id {
        return Ok(());
    }
    Err(AppError::Forbidden("Not a participant in this booking".into()))
}
