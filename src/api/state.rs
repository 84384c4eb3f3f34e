//! Application state for shared services

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::post::PostRepository;
use crate::domain::user::UserRepository;
use crate::domain::{
    Comment, DomainError, EmailSender, Post, PostLike, PostSorting, PostWithComments,
    PostWithLikes, User,
};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::post::PostService;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub post_service: Arc<dyn PostServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub email_sender: Arc<dyn EmailSender>,
    /// Configured external base URL for confirmation links
    pub public_url: Option<String>,
    /// Base URL used when neither `public_url` nor a `Host` header is available
    pub fallback_base_url: String,
    /// Present when backed by PostgreSQL, used by the readiness probe
    pub db_pool: Option<PgPool>,
}

/// Trait for user account operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<User, DomainError>;
    async fn login(&self, email: &str, password: &str) -> Result<User, DomainError>;
    async fn confirm(&self, email: &str) -> Result<(), DomainError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

/// Trait for post, comment and like operations
#[async_trait::async_trait]
pub trait PostServiceTrait: Send + Sync {
    async fn create_post(&self, user: &User, body: &str) -> Result<Post, DomainError>;
    async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError>;
    async fn get_post_with_comments(&self, post_id: i64)
        -> Result<PostWithComments, DomainError>;
    async fn create_comment(
        &self,
        user: &User,
        post_id: i64,
        body: &str,
    ) -> Result<Comment, DomainError>;
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
    async fn like_post(&self, user: &User, post_id: i64) -> Result<PostLike, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        UserService::register(self, email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        UserService::login(self, email, password).await
    }

    async fn confirm(&self, email: &str) -> Result<(), DomainError> {
        UserService::confirm(self, email).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_email(self, email).await
    }
}

#[async_trait::async_trait]
impl<R: PostRepository + 'static> PostServiceTrait for PostService<R> {
    async fn create_post(&self, user: &User, body: &str) -> Result<Post, DomainError> {
        PostService::create_post(self, user, body).await
    }

    async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError> {
        PostService::list_posts(self, sorting).await
    }

    async fn get_post_with_comments(
        &self,
        post_id: i64,
    ) -> Result<PostWithComments, DomainError> {
        PostService::get_post_with_comments(self, post_id).await
    }

    async fn create_comment(
        &self,
        user: &User,
        post_id: i64,
        body: &str,
    ) -> Result<Comment, DomainError> {
        PostService::create_comment(self, user, post_id, body).await
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        PostService::list_comments(self, post_id).await
    }

    async fn like_post(&self, user: &User, post_id: i64) -> Result<PostLike, DomainError> {
        PostService::like_post(self, user, post_id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        post_service: Arc<dyn PostServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            user_service,
            post_service,
            jwt_service,
            email_sender,
            public_url: None,
            fallback_base_url: "http://localhost:8000".to_string(),
            db_pool: None,
        }
    }

    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url.filter(|url| !url.is_empty());
        self
    }

    pub fn with_fallback_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.fallback_base_url = base_url.into();
        self
    }

    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Base URL for links sent by email: configured URL, then request host, then bind address
    pub fn base_url(&self, host: Option<&str>) -> String {
        let base = match (&self.public_url, host) {
            (Some(url), _) => url.clone(),
            (None, Some(host)) => format!("http://{}", host),
            (None, None) => self.fallback_base_url.clone(),
        };

        base.trim_end_matches('/').to_string()
    }
}
