// handlers/public/auth/login.rs - POST /api/authentication/login

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::database::models::{TokenDto, UserForAuthentication};
use crate::middleware::{ApiResponse, ApiResult};

/// Exchanges `{ "userName", "password" }` for `{ "accessToken", "refreshToken" }`.
/// Unknown users and wrong passwords both answer 401.
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<UserForAuthentication>, JsonRejection>,
) -> ApiResult<TokenDto> {
    let Json(body) = body?;
    let tokens = state.authentication.login(body).await?;
    Ok(ApiResponse::success(tokens))
}
