//! User service for registration, confirmation and authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{validate_email, validate_password, User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::logging::mask_email;

use super::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "Incorrect email or password";
const NOT_CONFIRMED: &str = "User has not confirmed email";

/// User service for account lifecycle and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher + 'static> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new, unconfirmed user
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(email).await? {
            return Err(DomainError::conflict(
                "A user with that email already exists",
            ));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self.repository.create(User::new(email, password_hash)).await?;

        info!(user_id = user.id(), email = %mask_email(email), "User registered");

        Ok(user)
    }

    /// Authenticate a user with email and password
    ///
    /// Unknown emails and wrong passwords are both rejected as unauthorized.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        debug!(email = %mask_email(email), "Authenticating user");

        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.verify_password(password, user.password_hash()).await? {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Authenticate a user and require that their email is confirmed
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self.authenticate(email, password).await?;

        if !user.is_confirmed() {
            return Err(DomainError::unauthorized(NOT_CONFIRMED));
        }

        Ok(user)
    }

    /// Mark the user owning an email address as confirmed
    pub async fn confirm(&self, email: &str) -> Result<(), DomainError> {
        if !self.repository.confirm(email).await? {
            return Err(DomainError::not_found("User not found"));
        }

        info!(email = %mask_email(email), "User confirmed");
        Ok(())
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email).await
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password verify task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::insecure_fast());
        UserService::new(repository, hasher)
    }

    fn is_unauthorized(result: &Result<User, DomainError>, expected: &str) -> bool {
        matches!(result, Err(DomainError::Unauthorized { message }) if message == expected)
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service.register("mary@example.com", "1234").await.unwrap();

        assert_eq!(user.email(), "mary@example.com");
        assert!(!user.is_confirmed());
        assert_ne!(user.password_hash(), "1234");
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = create_service();

        let result = service.register("not-an-email", "1234").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();
        service.register("mary@example.com", "1234").await.unwrap();

        let result = service.register("mary@example.com", "5678").await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();
        service.register("mary@example.com", "1234").await.unwrap();

        let user = service.authenticate("mary@example.com", "1234").await.unwrap();
        assert_eq!(user.email(), "mary@example.com");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();
        service.register("mary@example.com", "1234").await.unwrap();

        let result = service.authenticate("mary@example.com", "wrong").await;
        assert!(is_unauthorized(&result, INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let service = create_service();

        let result = service.authenticate("test@example.net", "1234").await;
        assert!(is_unauthorized(&result, INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_login_requires_confirmation() {
        let service = create_service();
        service.register("mary@example.com", "1234").await.unwrap();

        let result = service.login("mary@example.com", "1234").await;
        assert!(is_unauthorized(&result, NOT_CONFIRMED));

        service.confirm("mary@example.com").await.unwrap();

        let user = service.login("mary@example.com", "1234").await.unwrap();
        assert!(user.is_confirmed());
    }

    #[derive(Debug, Default)]
    struct ThreadRecordingHasher {
        inner: Argon2Hasher,
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ThreadRecordingHasher {
        fn record(&self) {
            self.threads.lock().unwrap().push(std::thread::current().id());
        }
    }

    impl PasswordHasher for ThreadRecordingHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            self.record();
            self.inner.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.record();
            self.inner.verify(password, hash)
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_runs_off_the_runtime_thread() {
        let hasher = Arc::new(ThreadRecordingHasher {
            inner: Argon2Hasher::insecure_fast(),
            ..ThreadRecordingHasher::default()
        });
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), hasher.clone());

        service.register("mary@example.com", "1234").await.unwrap();
        service.authenticate("mary@example.com", "1234").await.unwrap();

        let runtime_thread = std::thread::current().id();
        let threads = hasher.threads.lock().unwrap();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|id| *id != runtime_thread));
    }

    #[tokio::test]
    async fn test_confirm_unknown_user() {
        let service = create_service();

        let result = service.confirm("nobody@example.com").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
