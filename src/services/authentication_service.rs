use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::error::ServiceError;
use crate::auth::{generate_refresh_token, hash_password, verify_password, TokenService};
use crate::config::SecurityConfig;
use crate::database::models::user::KNOWN_ROLES;
use crate::database::models::{TokenDto, User, UserForAuthentication, UserForRegistration};
use crate::database::{DatabaseError, UserStore};

pub const PASSWORD_MIN_LENGTH: usize = 10;

const USER_NAME_SYMBOLS: &str = "-._@+";

/// Registration, login and refresh-token rotation.
pub struct AuthenticationService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    refresh_lifetime: Duration,
}

impl AuthenticationService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, security: &SecurityConfig) -> Self {
        Self {
            users,
            tokens,
            refresh_lifetime: Duration::days(security.refresh_token_days as i64),
        }
    }

    pub async fn register_user(&self, input: UserForRegistration) -> Result<(), ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;

        let user_name = input.user_name.as_deref().unwrap_or_default().trim();
        let email = input.email.as_deref().unwrap_or_default().trim();
        let password = input.password.as_deref().unwrap_or_default();

        let mut errors = password_errors(password);
        if !user_name.chars().all(|c| c.is_alphanumeric() || USER_NAME_SYMBOLS.contains(c)) {
            errors.insert(
                "InvalidUserName".to_string(),
                format!("Username '{}' is invalid, can only contain letters or digits.", user_name),
            );
        }
        for role in input.roles.iter().flatten() {
            if !KNOWN_ROLES.contains(&role.as_str()) {
                errors.insert("RoleNotFound".to_string(), format!("Role '{}' does not exist.", role));
            }
        }
        if self.users.find_user_by_name(user_name).await?.is_some() {
            errors.insert("DuplicateUserName".to_string(), format!("Username '{}' is already taken.", user_name));
        }
        if self.users.find_user_by_email(email).await?.is_some() {
            errors.insert("DuplicateEmail".to_string(), format!("Email '{}' is already taken.", email));
        }
        if !errors.is_empty() {
            warn!("Registration of '{}' rejected: {:?}", user_name, errors.keys().collect::<Vec<_>>());
            return Err(ServiceError::Registration(errors));
        }

        let user = User::new(&input, hash_password(password));
        match self.users.create_user(&user).await {
            Ok(()) => {}
            // lost a race with a concurrent registration
            Err(DatabaseError::Conflict(_)) => {
                return Err(ServiceError::Registration(HashMap::from([(
                    "DuplicateUserName".to_string(),
                    format!("Username '{}' is already taken.", user_name),
                )])));
            }
            Err(e) => return Err(e.into()),
        }
        info!("Registered user {} with roles {:?}", user.id, user.roles);
        Ok(())
    }

    /// Checks the credentials and issues a token pair whose refresh token
    /// expires after the configured number of days.
    pub async fn login(&self, input: UserForAuthentication) -> Result<TokenDto, ServiceError> {
        input.validate().map_err(ServiceError::Invalid)?;
        let user_name = input.user_name.as_deref().unwrap_or_default();
        let password = input.password.as_deref().unwrap_or_default();

        let user = match self.users.find_user_by_name(user_name).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!("{}", ServiceError::InvalidCredentials);
                return Err(ServiceError::InvalidCredentials);
            }
        };
        self.create_token(user, true).await
    }

    /// Rotates the refresh token. The expiry set at login is kept.
    pub async fn refresh(&self, dto: TokenDto) -> Result<TokenDto, ServiceError> {
        let claims = self.tokens.validate(&dto.access_token).map_err(|e| {
            warn!("Refresh with unusable access token: {}", e);
            ServiceError::RefreshTokenBadRequest
        })?;

        let user = self
            .users
            .find_user_by_name(&claims.sub)
            .await?
            .filter(|user| {
                user.refresh_token.as_deref() == Some(dto.refresh_token.as_str())
                    && user.refresh_token_expiry_time.is_some_and(|expiry| expiry > Utc::now())
            })
            .ok_or(ServiceError::RefreshTokenBadRequest)?;

        self.create_token(user, false).await
    }

    async fn create_token(&self, mut user: User, populate_expiration: bool) -> Result<TokenDto, ServiceError> {
        let access_token = self.tokens.issue(&user.user_name, &user.roles)?;
        user.refresh_token = Some(generate_refresh_token());
        if populate_expiration {
            user.refresh_token_expiry_time = Some(Utc::now() + self.refresh_lifetime);
        }
        self.users.update_user_tokens(&user).await?;

        Ok(TokenDto {
            access_token,
            refresh_token: user.refresh_token.unwrap_or_default(),
        })
    }
}

fn password_errors(password: &str) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.insert(
            "PasswordTooShort".to_string(),
            format!("Passwords must be at least {} characters.", PASSWORD_MIN_LENGTH),
        );
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.insert(
            "PasswordRequiresDigit".to_string(),
            "Passwords must have at least one digit ('0'-'9').".to_string(),
        );
    }
    errors
}
