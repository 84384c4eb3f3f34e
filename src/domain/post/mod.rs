//! Post domain
//!
//! Posts, comments on posts, and likes, plus the repository trait that stores them.

mod entity;
mod repository;
mod validation;

pub use entity::{Comment, Post, PostLike, PostSorting, PostWithComments, PostWithLikes};
pub use repository::PostRepository;
pub use validation::{validate_body, ContentValidationError};
