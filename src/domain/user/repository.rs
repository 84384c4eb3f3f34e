//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::User;
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their email (for login and token subjects)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Store a new user and return it with its assigned ID
    ///
    /// Fails with a conflict error if the email is already taken.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Mark the user with the given email as confirmed
    ///
    /// Returns false when no user has that email.
    async fn confirm(&self, email: &str) -> Result<bool, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
