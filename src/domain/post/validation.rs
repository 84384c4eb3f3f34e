//! Post and comment body validation

use thiserror::Error;

/// Errors that can occur while validating user-written content
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContentValidationError {
    #[error("Body cannot be empty")]
    EmptyBody,

    #[error("Body exceeds maximum length of {0} characters")]
    BodyTooLong(usize),
}

const MAX_BODY_LENGTH: usize = 10_000;

/// Validate the body of a post or comment
pub fn validate_body(body: &str) -> Result<(), ContentValidationError> {
    if body.trim().is_empty() {
        return Err(ContentValidationError::EmptyBody);
    }

    if body.chars().count() > MAX_BODY_LENGTH {
        return Err(ContentValidationError::BodyTooLong(MAX_BODY_LENGTH));
    }

    Ok(())
}
