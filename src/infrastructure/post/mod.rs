//! Post infrastructure module
//!
//! In-memory and PostgreSQL storage for posts, comments and likes,
//! and the service used by the HTTP handlers.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresPostRepository;
pub use repository::InMemoryPostRepository;
pub use service::PostService;
