// handlers/public/auth/register.rs - POST /api/authentication

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::app::AppState;
use crate::database::models::UserForRegistration;
use crate::middleware::{ApiResponse, ApiResult};

/// Registers a user.
///
/// ```json
/// { "firstName": "Ann", "lastName": "Lee", "userName": "ann", "password": "Password1000",
///   "email": "ann@example.com", "phoneNumber": "555-0100", "roles": ["Manager"] }
/// ```
///
/// 201 on success. Broken password or uniqueness rules answer 400 with
/// `field_errors` keyed by rule (`PasswordTooShort`, `DuplicateUserName`, ...).
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Json<UserForRegistration>, JsonRejection>,
) -> ApiResult<()> {
    let Json(body) = body?;
    state.authentication.register_user(body).await?;
    Ok(ApiResponse::with_status((), StatusCode::CREATED))
}
