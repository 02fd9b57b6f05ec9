use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub paging: PagingConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    /// Replaces the database path of `url` when set.
    pub name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
    pub seed_memory_store: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: u64,
    pub refresh_token_days: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Paging overrides
        if let Ok(v) = env::var("PAGING_DEFAULT_PAGE_SIZE") {
            self.paging.default_page_size = v.parse().unwrap_or(self.paging.default_page_size);
        }
        if let Ok(v) = env::var("PAGING_MAX_PAGE_SIZE") {
            self.paging.max_page_size = v.parse().unwrap_or(self.paging.max_page_size);
        }

        // Database overrides
        match env::var("DATABASE_BACKEND").as_deref() {
            Ok("postgres") => self.database.backend = DatabaseBackend::Postgres,
            Ok("memory") => self.database.backend = DatabaseBackend::Memory,
            _ => {}
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_NAME") {
            self.database.name = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }
        if let Ok(v) = env::var("DATABASE_SEED_MEMORY_STORE") {
            self.database.seed_memory_store = v.parse().unwrap_or(self.database.seed_memory_store);
        }

        // API overrides
        if let Ok(v) = env::var("API_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET").or_else(|_| env::var("SECRET")) {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes = v.parse().unwrap_or(self.security.jwt_expiry_minutes);
        }
        if let Ok(v) = env::var("SECURITY_REFRESH_TOKEN_DAYS") {
            self.security.refresh_token_days = v.parse().unwrap_or(self.security.refresh_token_days);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            paging: PagingConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Memory,
                url: None,
                name: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
                seed_memory_store: true,
            },
            api: ApiConfig {
                port: 3000,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
                jwt_secret: "development-only-secret-change-me-0123456789".to_string(),
                jwt_issuer: "CompanyEmployeesAPI".to_string(),
                jwt_audience: "http://localhost:3000".to_string(),
                jwt_expiry_minutes: 60,
                refresh_token_days: 7,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            paging: PagingConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Postgres,
                url: None,
                name: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
                seed_memory_store: false,
            },
            api: ApiConfig {
                port: 3000,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_issuer: "CompanyEmployeesAPI".to_string(),
                jwt_audience: "https://staging.example.com".to_string(),
                jwt_expiry_minutes: 30,
                refresh_token_days: 7,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            paging: PagingConfig {
                default_page_size: 10,
                max_page_size: 50,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Postgres,
                url: None,
                name: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
                seed_memory_store: false,
            },
            api: ApiConfig {
                port: 3000,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_issuer: "CompanyEmployeesAPI".to_string(),
                jwt_audience: "https://app.example.com".to_string(),
                jwt_expiry_minutes: 5,
                refresh_token_days: 7,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
