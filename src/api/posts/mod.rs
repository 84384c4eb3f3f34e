//! Post, comment and like endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::{Comment, Post, PostLike, PostSorting, PostWithComments, PostWithLikes};

/// Create the content router
pub fn create_posts_router() -> Router<AppState> {
    Router::new()
        .route("/post", post(create_post).get(list_posts))
        .route("/post/{post_id}", get(get_post_with_comments))
        .route("/post/{post_id}/comment", get(list_comments))
        .route("/comment", post(create_comment))
        .route("/like", post(like_post))
}

#[derive(Debug, Deserialize)]
pub struct PostIn {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentIn {
    pub body: String,
    pub post_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostLikeIn {
    pub post_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub sorting: PostSorting,
}

/// POST /post
pub async fn create_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<PostIn>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.post_service.create_post(&user, &request.body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /post
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<PostWithLikes>>, ApiError> {
    let posts = state.post_service.list_posts(query.sorting).await?;
    Ok(Json(posts))
}

/// GET /post/{post_id}
pub async fn get_post_with_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostWithComments>, ApiError> {
    let post = state.post_service.get_post_with_comments(post_id).await?;
    Ok(Json(post))
}

/// GET /post/{post_id}/comment
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.post_service.list_comments(post_id).await?;
    Ok(Json(comments))
}

/// POST /comment
pub async fn create_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CommentIn>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .post_service
        .create_comment(&user, request.post_id, &request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /like
pub async fn like_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<PostLikeIn>,
) -> Result<(StatusCode, Json<PostLike>), ApiError> {
    let like = state.post_service.like_post(&user, request.post_id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}
