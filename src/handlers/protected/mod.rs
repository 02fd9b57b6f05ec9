// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware injects AuthUser before any handler runs

pub mod companies;
pub mod employees;
