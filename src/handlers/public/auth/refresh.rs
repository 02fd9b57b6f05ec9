// handlers/public/auth/refresh.rs - POST /api/token/refresh

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::database::models::TokenDto;
use crate::middleware::{ApiResponse, ApiResult};

/// Takes the current token pair and returns a new one. A replaced or expired
/// refresh token answers 400.
pub async fn refresh_post(
    State(state): State<AppState>,
    body: Result<Json<TokenDto>, JsonRejection>,
) -> ApiResult<TokenDto> {
    let Json(body) = body?;
    let tokens = state.authentication.refresh(body).await?;
    Ok(ApiResponse::success(tokens))
}
