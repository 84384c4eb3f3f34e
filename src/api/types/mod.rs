//! Request/response types shared by the HTTP handlers

pub mod error;
pub mod extract;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use extract::{Path, Query};
pub use json::Json;
