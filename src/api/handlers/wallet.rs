use crate::api::dtos::responses::BalanceResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::developer::validate_wallet_address;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_wallet_address(&address)?;
    let balance = state.payment_gateway.get_balance(&address).await?;
    Ok(Json(BalanceResponse { address, balance }))
}
