//! PostgreSQL post repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::post::{Comment, Post, PostLike, PostRepository, PostSorting, PostWithLikes};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_foreign_key_violation;

const SELECT_POSTS_WITH_LIKES: &str = r#"
    SELECT p.id, p.body, p.user_id, COUNT(l.id) AS likes
    FROM posts p
    LEFT JOIN likes l ON l.post_id = p.id
"#;

/// PostgreSQL implementation of PostRepository
#[derive(Debug, Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_clause(sorting: PostSorting) -> &'static str {
    match sorting {
        PostSorting::New => "ORDER BY p.id DESC",
        PostSorting::Old => "ORDER BY p.id ASC",
        PostSorting::MostLikes => "ORDER BY likes DESC, p.id DESC",
    }
}

fn map_insert_error(e: sqlx::Error, what: &str) -> DomainError {
    if is_foreign_key_violation(&e) {
        DomainError::not_found("Post not found")
    } else {
        DomainError::storage(format!("Failed to create {}: {}", what, e))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, body: &str, user_id: i64) -> Result<Post, DomainError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO posts (body, user_id) VALUES ($1, $2) RETURNING id")
                .bind(body)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create post: {}", e)))?;

        Ok(Post {
            id,
            body: body.to_string(),
            user_id,
        })
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query("SELECT id, body, user_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        Ok(row.map(|row| Post {
            id: row.get("id"),
            body: row.get("body"),
            user_id: row.get("user_id"),
        }))
    }

    async fn get_post_with_likes(&self, id: i64) -> Result<Option<PostWithLikes>, DomainError> {
        let query = format!("{} WHERE p.id = $1 GROUP BY p.id", SELECT_POSTS_WITH_LIKES);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        Ok(row.as_ref().map(row_to_post_with_likes))
    }

    async fn list_posts(&self, sorting: PostSorting) -> Result<Vec<PostWithLikes>, DomainError> {
        let query = format!(
            "{} GROUP BY p.id {}",
            SELECT_POSTS_WITH_LIKES,
            order_clause(sorting)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list posts: {}", e)))?;

        Ok(rows.iter().map(row_to_post_with_likes).collect())
    }

    async fn create_comment(
        &self,
        body: &str,
        post_id: i64,
        user_id: i64,
    ) -> Result<Comment, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (body, post_id, user_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(body)
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "comment"))?;

        Ok(Comment {
            id,
            body: body.to_string(),
            post_id,
            user_id,
        })
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, body, post_id, user_id FROM comments WHERE post_id = $1 ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list comments: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| Comment {
                id: row.get("id"),
                body: row.get("body"),
                post_id: row.get("post_id"),
                user_id: row.get("user_id"),
            })
            .collect())
    }

    async fn create_like(&self, post_id: i64, user_id: i64) -> Result<PostLike, DomainError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO likes (post_id, user_id) VALUES ($1, $2) RETURNING id")
                .bind(post_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_insert_error(e, "like"))?;

        Ok(PostLike {
            id,
            post_id,
            user_id,
        })
    }
}

fn row_to_post_with_likes(row: &sqlx::postgres::PgRow) -> PostWithLikes {
    PostWithLikes {
        id: row.get("id"),
        body: row.get("body"),
        user_id: row.get("user_id"),
        likes: row.get("likes"),
    }
}
