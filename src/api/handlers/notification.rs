use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn list_notifications(
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

    let notifications = state.notification_repo.list_by_developer(&developer_id).await?;
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification = state
        .notification_repo
        .find_by_id(&notification_id)
        .await?
        .ok_or(AppError::NotFound("Notification not found".into()))?;

    let developer = state
        .developer_repo
        .find_by_id(&notification.developer_id)
        .await?
        .ok_or(AppError::NotFound("Developer not found".into()))?;
    if developer.user_id != user.user_id {
        return Err(AppError::Forbidden("Not the profile owner".into()));
    }

    state.notification_repo.mark_read(&notification_id).await?;
    Ok(Json(serde_json::json!({"status": "read"})))
}
