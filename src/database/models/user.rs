use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roles a user can be registered with.
pub const KNOWN_ROLES: [&str; 2] = ["Manager", "Administrator"];

/// Upper-cased, trimmed form used for unique name and email lookups.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Persisted account. Never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub refresh_token: Option<String>,
    pub refresh_token_expiry_time: Option<DateTime<Utc>>,
}

impl User {
    /// Builds an account from a validated registration body.
    pub fn new(input: &UserForRegistration, password_hash: String) -> Self {
        let user_name = input.user_name.as_deref().unwrap_or_default().trim().to_string();
        let email = input.email.as_deref().unwrap_or_default().trim().to_string();
        Self {
            id: Uuid::new_v4(),
            normalized_user_name: normalize(&user_name),
            normalized_email: normalize(&email),
            user_name,
            email,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            password_hash,
            roles: input.roles.clone().unwrap_or_default(),
            refresh_token: None,
            refresh_token_expiry_time: None,
        }
    }
}

/// Body of `POST /api/authentication`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForRegistration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl UserForRegistration {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        if is_blank(&self.user_name) {
            errors.insert("userName".to_string(), "'UserName' is required".to_string());
        }
        if is_blank(&self.password) {
            errors.insert("password".to_string(), "'Password' is required".to_string());
        }
        match self.email.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("email".to_string(), "'Email' is required".to_string());
            }
            Some(email) if !looks_like_email(email) => {
                errors.insert("email".to_string(), "'Email' is invalid.".to_string());
            }
            _ => {}
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Body of `POST /api/authentication/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForAuthentication {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

impl UserForAuthentication {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        if is_blank(&self.user_name) {
            errors.insert("userName".to_string(), "'UserName' is required.".to_string());
        }
        if is_blank(&self.password) {
            errors.insert("password".to_string(), "'Password' is required.".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Access and refresh token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub access_token: String,
    pub refresh_token: String,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

// one '@', non-empty local part, dotted domain, no whitespace
fn looks_like_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}
