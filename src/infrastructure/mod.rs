//! Infrastructure layer - External service implementations

pub mod auth;
pub mod email;
pub mod logging;
pub mod observability;
pub mod post;
pub mod storage;
pub mod user;
