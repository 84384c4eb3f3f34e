//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row =
            sqlx::query("SELECT id, email, password, confirmed FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password, confirmed)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.is_confirmed())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("A user with that email already exists")
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user.with_id(id))
    }

    async fn confirm(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET confirmed = TRUE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to confirm user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User::from_storage(
        row.get::<i64, _>("id"),
        row.get::<String, _>("email"),
        row.get::<String, _>("password"),
        row.get::<bool, _>("confirmed"),
    )
}
