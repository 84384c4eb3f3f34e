//! Repository trait for posts, comments and likes

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Comment, Post, PostLike, PostSorting, PostWithLikes};
use crate::domain::DomainError;

/// Storage for posts and the comments and likes that hang off them
#[async_trait]
pub trait PostRepository: Send + Sync + Debug {
    /// Store a new post
    async fn create_post(&self, body: &str, user_id: i64) -> Result<Post, DomainError>;

    /// Get a post by ID
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;

    /// Get a post by ID together with its like count
    async fn get_post_with_likes(&self, id: i64) -> Result<Option<PostWithLikes>, DomainError>;

    /// List every post with its like count
    async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError>;

    /// Store a new comment
    ///
    /// Callers check that the post exists first; storage enforces it as well.
    async fn create_comment(
        &self,
        body: &str,
        post_id: i64,
        user_id: i64,
    ) -> Result<Comment, DomainError>;

    /// List the comments on a post, oldest first
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;

    /// Store a new like
    async fn create_like(&self, post_id: i64, user_id: i64) -> Result<PostLike, DomainError>;
}
