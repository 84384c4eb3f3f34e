//! Post service orchestrating posts, comments and likes

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::post::{
    validate_body, Comment, Post, PostLike, PostRepository, PostSorting, PostWithComments,
    PostWithLikes,
};
use crate::domain::user::User;
use crate::domain::DomainError;

/// Service for user-written content
#[derive(Debug)]
pub struct PostService<R: PostRepository> {
    repository: Arc<R>,
}

impl<R: PostRepository> PostService<R> {
    /// Create a new post service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Only confirmed users may write content
    fn ensure_can_write(user: &User) -> Result<(), DomainError> {
        if !user.is_confirmed() {
            return Err(DomainError::unauthorized("User has not confirmed email"));
        }
        Ok(())
    }

    async fn find_post(&self, post_id: i64) -> Result<Post, DomainError> {
        debug!(post_id, "Finding post");

        self.repository.get_post(post_id).await?.ok_or_else(|| {
            warn!(post_id, "Post not found");
            DomainError::not_found("Post not found")
        })
    }

    /// Create a post owned by the given user
    pub async fn create_post(&self, user: &User, body: &str) -> Result<Post, DomainError> {
        Self::ensure_can_write(user)?;
        validate_body(body).map_err(|e| DomainError::validation(e.to_string()))?;

        let post = self.repository.create_post(body, user.id()).await?;
        info!(post_id = post.id, user_id = user.id(), "Post created");

        Ok(post)
    }

    /// List every post with its like count
    pub async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError> {
        debug!(?sorting, "Listing posts");
        self.repository.list_posts(sorting).await
    }

    /// Get a post with its like count and comments
    pub async fn get_post_with_comments(
        &self,
        post_id: i64,
    ) -> Result<PostWithComments, DomainError> {
        let post = self
            .repository
            .get_post_with_likes(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post not found"))?;

        let comments = self.repository.list_comments(post_id).await?;

        Ok(PostWithComments { post, comments })
    }

    /// Comment on an existing post
    pub async fn create_comment(
        &self,
        user: &User,
        post_id: i64,
        body: &str,
    ) -> Result<Comment, DomainError> {
        Self::ensure_can_write(user)?;
        validate_body(body).map_err(|e| DomainError::validation(e.to_string()))?;
        self.find_post(post_id).await?;

        let comment = self.repository.create_comment(body, post_id, user.id()).await?;
        info!(
            comment_id = comment.id,
            post_id,
            user_id = user.id(),
            "Comment created"
        );

        Ok(comment)
    }

    /// List the comments on a post
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        debug!(post_id, "Listing comments");
        self.repository.list_comments(post_id).await
    }

    /// Like an existing post
    pub async fn like_post(&self, user: &User, post_id: i64) -> Result<PostLike, DomainError> {
        Self::ensure_can_write(user)?;
        self.find_post(post_id).await?;

        let like = self.repository.create_like(post_id, user.id()).await?;
        info!(post_id, user_id = user.id(), "Post liked");

        Ok(like)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::post::repository::InMemoryPostRepository;

    fn create_service() -> PostService<InMemoryPostRepository> {
        PostService::new(Arc::new(InMemoryPostRepository::new()))
    }

    fn confirmed_user() -> User {
        User::from_storage(1, "mary@example.com", "hash", true)
    }

    fn unconfirmed_user() -> User {
        User::from_storage(2, "bob@example.com", "hash", false)
    }

    #[tokio::test]
    async fn test_create_post() {
        let service = create_service();

        let post = service.create_post(&confirmed_user(), "Test Post").await.unwrap();

        assert_eq!(post.body, "Test Post");
        assert_eq!(post.user_id, 1);
    }

    #[tokio::test]
    async fn test_create_post_unconfirmed_user() {
        let service = create_service();

        let result = service.create_post(&unconfirmed_user(), "Test Post").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_create_post_blank_body() {
        let service = create_service();

        let result = service.create_post(&confirmed_user(), "  ").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_comment_missing_post() {
        let service = create_service();

        let result = service
            .create_comment(&confirmed_user(), 2, "Test Comment")
            .await;
        assert!(
            matches!(result, Err(DomainError::NotFound { message }) if message == "Post not found")
        );
    }

    #[tokio::test]
    async fn test_get_post_with_comments() {
        let service = create_service();
        let user = confirmed_user();
        let post = service.create_post(&user, "Test Post").await.unwrap();
        service.create_comment(&user, post.id, "Test Comment").await.unwrap();
        service.like_post(&user, post.id).await.unwrap();

        let result = service.get_post_with_comments(post.id).await.unwrap();

        assert_eq!(result.post.id, post.id);
        assert_eq!(result.post.likes, 1);
        assert_eq!(result.comments.len(), 1);
        assert_eq!(result.comments[0].body, "Test Comment");
        assert_eq!(result.comments[0].user_id, user.id());
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let service = create_service();

        let result = service.get_post_with_comments(5).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let service = create_service();

        let result = service.like_post(&confirmed_user(), 3).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
