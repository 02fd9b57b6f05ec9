use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderName,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{
    EmployeeDto, EmployeeForManipulation, EmployeeParameters, EmployeeQueryParams, JsonPatch,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::query::ShapedRecord;

pub static X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

/// GET|HEAD /api/companies/:companyId/employees
///
/// Query: `minAge`, `maxAge`, `searchTerm`, `orderBy` (e.g. `age desc,name`),
/// `fields` (e.g. `name,age`), `pageNumber`, `pageSize`. The page summary goes
/// into the `X-Pagination` header as JSON:
/// ```json
/// {"CurrentPage":2,"TotalPages":3,"PageSize":10,"TotalCount":25,"HasPrevious":true,"HasNext":true}
/// ```
pub async fn list(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<EmployeeQueryParams>, QueryRejection>,
) -> ApiResult<Vec<ShapedRecord>> {
    let Path(company_id) = path?;
    let Query(query) = query?;
    let params = EmployeeParameters::new(query, &state.paging);

    let (records, meta) = state.employees.get_employees_page(company_id, &params).await?;
    let pagination = serde_json::to_string(&meta).map_err(|e| {
        tracing::error!("Failed to serialize pagination metadata: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;

    Ok(ApiResponse::success(records).with_header(X_PAGINATION.clone(), &pagination))
}

/// GET /api/companies/:companyId/employees/:employeeId - accepts `fields`
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    query: Result<Query<FieldsQuery>, QueryRejection>,
) -> ApiResult<ShapedRecord> {
    let Path((company_id, id)) = path?;
    let Query(query) = query?;
    let record = state
        .employees
        .get_employee_shaped(company_id, id, query.fields.as_deref())
        .await?;
    Ok(ApiResponse::success(record))
}

/// POST /api/companies/:companyId/employees
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<EmployeeForManipulation>, JsonRejection>,
) -> ApiResult<EmployeeDto> {
    let Path(company_id) = path?;
    let Json(body) = body?;
    let employee = state.employees.create_employee(company_id, body).await?;
    tracing::info!("Employee {} created by {}", employee.id, user.subject);
    let location = format!("/api/companies/{}/employees/{}", company_id, employee.id);
    Ok(ApiResponse::created(employee, &location))
}

/// PUT /api/companies/:companyId/employees/:employeeId
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<EmployeeForManipulation>, JsonRejection>,
) -> ApiResult<()> {
    let Path((company_id, id)) = path?;
    let Json(body) = body?;
    state.employees.update_employee(company_id, id, body).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/companies/:companyId/employees/:employeeId
///
/// Body is a JSON Patch document, e.g. `[{ "op": "replace", "path": "/age", "value": 27 }]`.
/// A `null` body answers 400.
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<Option<JsonPatch>>, JsonRejection>,
) -> ApiResult<()> {
    let Path((company_id, id)) = path?;
    let Json(patch) = body?;
    state.employees.patch_employee(company_id, id, patch).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/companies/:companyId/employees/:employeeId
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    let Path((company_id, id)) = path?;
    state.employees.delete_employee(company_id, id).await?;
    Ok(ApiResponse::no_content())
}
