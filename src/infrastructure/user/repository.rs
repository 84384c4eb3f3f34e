//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<i64, User>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, i64>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict(
                "A user with that email already exists",
            ));
        }

        table.last_id += 1;
        let user = user.with_id(table.last_id);

        table.email_index.insert(user.email().to_string(), user.id());
        table.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn confirm(&self, email: &str) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        let Some(id) = table.email_index.get(email).copied() else {
            return Ok(false);
        };

        match table.users.get_mut(&id) {
            Some(user) => {
                user.confirm();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(User::new("a@example.com", "hash")).await.unwrap();
        let second = repo.create(User::new("b@example.com", "hash")).await.unwrap();

        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
    }

    #[tokio::test]
    async fn test_get_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create(User::new("mary@example.com", "hash"))
            .await
            .unwrap();

        let by_email = repo.get_by_email("mary@example.com").await.unwrap();
        assert_eq!(by_email, Some(created));
    }

    #[tokio::test]
    async fn test_user_not_found() {
        let repo = InMemoryUserRepository::new();

        assert!(repo.get_by_email("test3@example.com").await.unwrap().is_none());
        assert!(!repo.email_exists("test3@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("mary@example.com", "hash")).await.unwrap();

        let result = repo.create(User::new("mary@example.com", "other")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_confirm() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("mary@example.com", "hash")).await.unwrap();

        assert!(repo.confirm("mary@example.com").await.unwrap());
        assert!(!repo.confirm("nobody@example.com").await.unwrap());

        let user = repo.get_by_email("mary@example.com").await.unwrap().unwrap();
        assert!(user.is_confirmed());
    }
}
