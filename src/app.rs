use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, options, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::{JwtError, TokenService};
use crate::config::{AppConfig, DatabaseBackend, DatabaseConfig, PagingConfig, SecurityConfig};
use crate::database::{DatabaseError, DatabaseManager, MemoryStore, PgStore, Store, UserStore};
use crate::error::ApiError;
use crate::handlers::protected::{companies, employees};
use crate::handlers::public::{self, auth};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthenticationService, CompanyService, EmployeeService};

/// Company data and accounts, usually served by one backend.
#[derive(Clone)]
pub struct Stores {
    pub data: Arc<dyn Store>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn from_backend<S: Store + UserStore + 'static>(backend: S) -> Self {
        let backend = Arc::new(backend);
        Self { data: backend.clone(), users: backend }
    }
}

/// Shared, cheaply cloned handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub companies: Arc<CompanyService>,
    pub employees: Arc<EmployeeService>,
    pub authentication: Arc<AuthenticationService>,
    pub tokens: Arc<TokenService>,
    pub paging: PagingConfig,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Result<Self, JwtError> {
        let tokens = Arc::new(TokenService::new(&config.security)?);
        Ok(Self {
            companies: Arc::new(CompanyService::new(stores.data.clone())),
            employees: Arc::new(EmployeeService::new(stores.data.clone())),
            authentication: Arc::new(AuthenticationService::new(stores.users, tokens.clone(), &config.security)),
            tokens,
            paging: config.paging.clone(),
            store: stores.data,
        })
    }
}

/// Opens the configured store backend.
pub async fn build_stores(config: &DatabaseConfig) -> Result<Stores, DatabaseError> {
    match config.backend {
        DatabaseBackend::Postgres => {
            let pool = DatabaseManager::connect(config).await?;
            Ok(Stores::from_backend(PgStore::new(pool)))
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory store (seeded: {})", config.seed_memory_store);
            if config.seed_memory_store {
                Ok(Stores::from_backend(MemoryStore::seeded()))
            } else {
                Ok(Stores::from_backend(MemoryStore::new()))
            }
        }
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let protected = Router::new()
        .merge(company_routes())
        .merge(employee_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/authentication", post(auth::register_post))
        .route("/api/authentication/login", post(auth::login_post))
        .route("/api/token/refresh", post(auth::refresh_post))
        .route("/api/companies", options(public::companies_options))
        // Protected API
        .merge(protected)
        .fallback(not_found)
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/api/companies", get(companies::list).post(companies::create))
        .route("/api/companies/collection", post(companies::create_collection))
        .route("/api/companies/collection/:ids", get(companies::get_collection))
        .route(
            "/api/companies/:company_id",
            get(companies::get).put(companies::update).delete(companies::delete),
        )
}

fn employee_routes() -> Router<AppState> {
    Router::new()
        // GET also answers HEAD
        .route(
            "/api/companies/:company_id/employees",
            get(employees::list).post(employees::create),
        )
        .route(
            "/api/companies/:company_id/employees/:employee_id",
            get(employees::get)
                .put(employees::update)
                .patch(employees::patch)
                .delete(employees::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origin = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {:?}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([employees::X_PAGINATION.clone(), header::LOCATION])
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
