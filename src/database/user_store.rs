use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::User;

/// Account persistence. Name and email lookups go through their normalized forms.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the name or email is taken.
    async fn create_user(&self, user: &User) -> Result<(), DatabaseError>;

    /// Persists the refresh token and its expiry.
    async fn update_user_tokens(&self, user: &User) -> Result<bool, DatabaseError>;
}
