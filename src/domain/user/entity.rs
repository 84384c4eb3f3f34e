//! User entity and related types

use serde::{Deserialize, Serialize};

/// Registered account, identified by its email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Storage-assigned identifier, zero until persisted
    id: i64,
    /// Unique email address used for login
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    /// Whether the email address has been confirmed
    confirmed: bool,
}

impl User {
    /// Create a new, unconfirmed user that has not been stored yet
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: 0,
            email: email.into(),
            password_hash: password_hash.into(),
            confirmed: false,
        }
    }

    /// Rebuild a user from a stored row
    pub fn from_storage(
        id: i64,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        confirmed: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            confirmed,
        }
    }

    /// Return the same user with the identifier assigned by storage
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Mark the email address as confirmed
    pub fn confirm(&mut self) {
        self.confirmed = true;
    }
}
