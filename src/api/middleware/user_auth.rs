//! Bearer token authentication for protected endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::infrastructure::auth::TokenType;
use crate::infrastructure::logging::mask_email;

/// Extractor that resolves `Authorization: Bearer <access token>` to a stored user
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user = current_user(state, &token).await?;

        Ok(RequireUser(user))
    }
}

/// Decode an access token and load the user named by its subject
pub async fn current_user(state: &AppState, token: &str) -> Result<User, ApiError> {
    let email = state
        .jwt_service
        .subject_for_token_type(token, TokenType::Access)?;

    debug!(email = %mask_email(&email), "Access token accepted");

    state
        .user_service
        .get_by_email(&email)
        .await?
        .ok_or_else(|| {
            warn!(email = %mask_email(&email), "Token subject has no matching user");
            ApiError::unauthorized("Could not find user for this token")
        })
}

/// Extract the token from a `Bearer` Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    token
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}
