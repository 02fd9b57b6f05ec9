use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{CompanyDto, CompanyForManipulation};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::parse_ids;

/// GET /api/companies
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CompanyDto>> {
    let companies = state.companies.get_all_companies().await?;
    Ok(ApiResponse::success(companies))
}

/// GET /api/companies/:companyId
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CompanyDto> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.companies.get_company(id).await?))
}

/// POST /api/companies - optionally with nested employees
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CompanyForManipulation>, JsonRejection>,
) -> ApiResult<CompanyDto> {
    let Json(body) = body?;
    let company = state.companies.create_company(body).await?;
    tracing::info!("Company {} created by {}", company.id, user.subject);
    let location = format!("/api/companies/{}", company.id);
    Ok(ApiResponse::created(company, &location))
}

/// GET /api/companies/collection/:ids - ids as `(id1,id2)` or `id1,id2`
pub async fn get_collection(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<CompanyDto>> {
    let Path(raw) = path?;
    let ids = parse_ids(&raw);
    Ok(ApiResponse::success(state.companies.get_by_ids(&ids).await?))
}

/// POST /api/companies/collection
pub async fn create_collection(
    State(state): State<AppState>,
    body: Result<Json<Option<Vec<CompanyForManipulation>>>, JsonRejection>,
) -> ApiResult<Vec<CompanyDto>> {
    let Json(body) = body?;
    let (companies, ids) = state.companies.create_company_collection(body).await?;
    let location = format!("/api/companies/collection/({})", ids);
    Ok(ApiResponse::created(companies, &location))
}

/// PUT /api/companies/:companyId
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CompanyForManipulation>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(body) = body?;
    state.companies.update_company(id, body).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/companies/:companyId
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.companies.delete_company(id).await?;
    Ok(ApiResponse::no_content())
}
