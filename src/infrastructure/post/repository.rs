//! In-memory post repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::post::{Comment, Post, PostLike, PostRepository, PostSorting, PostWithLikes};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct PostTables {
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    likes: BTreeMap<i64, PostLike>,
    last_post_id: i64,
    last_comment_id: i64,
    last_like_id: i64,
}

impl PostTables {
    fn like_count(&self, post_id: i64) -> i64 {
        self.likes.values().filter(|l| l.post_id == post_id).count() as i64
    }

    fn require_post(&self, post_id: i64) -> Result<(), DomainError> {
        if self.posts.contains_key(&post_id) {
            Ok(())
        } else {
            Err(DomainError::not_found("Post not found"))
        }
    }
}

/// In-memory implementation of PostRepository
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<PostTables>>,
}

impl InMemoryPostRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, body: &str, user_id: i64) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;

        let post = Post {
            id: tables.last_post_id,
            body: body.to_string(),
            user_id,
        };
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn get_post_with_likes(&self, id: i64) -> Result<Option<PostWithLikes>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .posts
            .get(&id)
            .map(|post| PostWithLikes::new(post.clone(), tables.like_count(id))))
    }

    async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<PostWithLikes> = tables
            .posts
            .values()
            .map(|post| PostWithLikes::new(post.clone(), tables.like_count(post.id)))
            .collect();
        sorting.apply(&mut posts);

        Ok(posts)
    }

    async fn create_comment(
        &self,
        body: &str,
        post_id: i64,
        user_id: i64,
    ) -> Result<Comment, DomainError> {
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        tables.last_comment_id += 1;

        let comment = Comment {
            id: tables.last_comment_id,
            body: body.to_string(),
            post_id,
            user_id,
        };
        tables.comments.insert(comment.id, comment.clone());

        Ok(comment)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create_like(&self, post_id: i64, user_id: i64) -> Result<PostLike, DomainError> {
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        tables.last_like_id += 1;

        let like = PostLike {
            id: tables.last_like_id,
            post_id,
            user_id,
        };
        tables.likes.insert(like.id, like.clone());

        Ok(like)
    }
}
