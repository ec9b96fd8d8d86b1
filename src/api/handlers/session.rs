use crate::api::dtos::responses::JoinStatusResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::session_window::{
    is_joinable, CLIENT_VIEW_WINDOW, DEVELOPER_VIEW_WINDOW,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// Whether the caller may join the session right now. The client and
/// developer dashboards use different windows; the caller's view picks one.
pub async fn join_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let developer = state
        .developer_repo
        .find_by_id(&booking.developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;

    let is_client = booking.client_id == user.user_id;
    let is_developer = developer.user_id == user.user_id;
    if !is_client && !is_developer {
        return Err(AppError::Forbidden("Not a participant in this booking".into()));
    }

    let window = match params.get("view").map(String::as_str) {
        Some("developer") => {
            if !is_developer {
                return Err(AppError::Forbidden("Developer view requires the profile owner".into()));
            }
            DEVELOPER_VIEW_WINDOW
        }
        _ => CLIENT_VIEW_WINDOW,
    };

    let joinable = !booking.is_terminal()
        && is_joinable(booking.session_start, booking.session_end, Utc::now(), window);

    let join_url = joinable.then(|| {
        format!("{}/{}", state.config.video_base_url, booking.room_id)
    });

    Ok(Json(JoinStatusResponse {
        joinable,
        room_id: booking.room_id,
        join_url,
    }))
}
