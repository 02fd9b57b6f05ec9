// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service discovery, liveness and authentication. No auth middleware.

pub mod auth;

use axum::{
    extract::State,
    http::{header::ALLOW, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Company Employees API",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "register": "POST /api/authentication (public)",
                "login": "POST /api/authentication/login (public)",
                "refresh": "POST /api/token/refresh (public)",
                "companies": "/api/companies[/:companyId] (protected)",
                "collections": "/api/companies/collection[/(:ids)] (protected)",
                "employees": "/api/companies/:companyId/employees[/:employeeId] (protected)",
            },
            "employee_query": ["minAge", "maxAge", "searchTerm", "orderBy", "fields", "pageNumber", "pageSize"],
        }
    }))
}

pub const COMPANIES_ALLOW: &str = "GET, OPTIONS, POST, PUT, DELETE";

/// OPTIONS /api/companies - methods the companies resource accepts
pub async fn companies_options() -> impl IntoResponse {
    (StatusCode::OK, [(ALLOW, COMPANIES_ALLOW)])
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
