//! Domain layer - Core business logic and entities

pub mod email;
pub mod error;
pub mod post;
pub mod user;

pub use email::{EmailMessage, EmailSender};
pub use error::DomainError;
pub use post::{
    validate_body, Comment, ContentValidationError, Post, PostLike, PostRepository, PostSorting,
    PostWithComments, PostWithLikes,
};
pub use user::{validate_email, validate_password, User, UserRepository, UserValidationError};
