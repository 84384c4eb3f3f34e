//! Account endpoints
//!
//! Registration with an emailed confirmation link, confirmation, and
//! login returning a bearer access token.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::EmailMessage;
use crate::infrastructure::auth::TokenType;
use crate::infrastructure::email::dispatch_in_background;
use crate::infrastructure::logging::mask_email;
use crate::infrastructure::observability::{record_confirmation, record_registration};

/// Create the account router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(login))
        .route("/confirm/{token}", get(confirm_email))
}

/// Email and password, used by both registration and login
#[derive(Debug, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /register
///
/// Stores an unconfirmed user and emails a confirmation link in the background.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UserCredentials>,
) -> Result<(StatusCode, Json<DetailResponse>), ApiError> {
    let user = state
        .user_service
        .register(&request.email, &request.password)
        .await?;
    record_registration();

    let token = state.jwt_service.create_confirmation_token(user.email())?;
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let confirmation_url = format!("{}/confirm/{}", state.base_url(host), token);

    dispatch_in_background(
        state.email_sender.clone(),
        EmailMessage::registration(user.email(), &confirmation_url),
    );

    Ok((
        StatusCode::CREATED,
        Json(DetailResponse::new(
            "User created. Please confirm your email.",
        )),
    ))
}

/// POST /token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<UserCredentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .user_service
        .login(&request.email, &request.password)
        .await?;

    let access_token = state.jwt_service.create_access_token(user.email())?;
    info!(
        email = %mask_email(user.email()),
        expires_in_minutes = state.jwt_service.access_token_expire_minutes(),
        "Access token issued"
    );

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /confirm/{token}
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
    let email = state
        .jwt_service
        .subject_for_token_type(&token, TokenType::Confirmation)?;

    state.user_service.confirm(&email).await?;
    record_confirmation();

    Ok(Json(DetailResponse::new("User confirmed")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::router::create_router;
    use crate::api::test_support::{
        confirmation_token, get_request, json_request, login, register, send, test_app,
        test_state_with, RecordingEmailSender, TEST_SECRET,
    };
    use crate::infrastructure::auth::JwtConfig;

    use super::*;

    #[tokio::test]
    async fn test_register_user() {
        let (app, sender) = test_app();

        let (status, body) = register(&app, "test@example.net", "1234").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["detail"], "User created. Please confirm your email.");

        let messages = sender.wait_for(1).await;
        assert_eq!(messages[0].to, "test@example.net");
        assert_eq!(messages[0].subject, "Successfully signed up");
        assert!(messages[0].body.contains("http://test/confirm/"));
    }

    #[tokio::test]
    async fn test_register_user_already_exists() {
        let (app, _) = test_app();
        register(&app, "test@example.net", "1234").await;

        let (status, body) = register(&app, "test@example.net", "1234").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "A user with that email already exists");
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let (app, _) = test_app();

        let (status, body) = register(&app, "not-an-email", "1234").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_register_malformed_json() {
        let (app, _) = test_app();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"email\":"))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_confirm_user() {
        let (app, sender) = test_app();
        register(&app, "test@example.net", "1234").await;
        let messages = sender.wait_for(1).await;
        let token = confirmation_token(&messages[0]);

        let (status, body) = send(&app, get_request(&format!("/confirm/{}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "User confirmed");

        let (status, _) = send(&app, get_request(&format!("/confirm/{}", token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_confirm_user_invalid_token() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get_request("/confirm/invalid_token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token");
    }

    #[tokio::test]
    async fn test_confirm_expired_token() {
        let sender = Arc::new(RecordingEmailSender::default());
        let state = test_state_with(JwtConfig::new(TEST_SECRET, 30, -1), sender.clone());
        let app = create_router(state, None);
        register(&app, "test@example.net", "1234").await;
        let messages = sender.wait_for(1).await;
        let token = confirmation_token(&messages[0]);

        let (status, body) = send(&app, get_request(&format!("/confirm/{}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["detail"].as_str().unwrap().contains("expired"));
    }

    #[tokio::test]
    async fn test_confirm_rejects_access_token() {
        let (app, sender) = test_app();
        register(&app, "test@example.net", "1234").await;
        let messages = sender.wait_for(1).await;
        send(
            &app,
            get_request(&format!("/confirm/{}", confirmation_token(&messages[0]))),
        )
        .await;
        let (_, body) = login(&app, "test@example.net", "1234").await;
        let access_token = body["access_token"].as_str().unwrap();

        let (status, body) = send(&app, get_request(&format!("/confirm/{}", access_token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["detail"],
            "Token has incorrect type, expected 'confirmation'"
        );
    }

    #[tokio::test]
    async fn test_login_user_not_exists() {
        let (app, _) = test_app();

        let (status, body) = login(&app, "test@example.net", "1234").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_login_user_not_confirmed() {
        let (app, _) = test_app();
        register(&app, "test@example.net", "1234").await;

        let (status, body) = login(&app, "test@example.net", "1234").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "User has not confirmed email");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (app, sender) = test_app();
        register(&app, "test@example.net", "1234").await;
        let messages = sender.wait_for(1).await;
        send(
            &app,
            get_request(&format!("/confirm/{}", confirmation_token(&messages[0]))),
        )
        .await;

        let (status, _) = login(&app, "test@example.net", "4321").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_user() {
        let (app, sender) = test_app();
        register(&app, "test@example.net", "1234").await;
        let messages = sender.wait_for(1).await;
        send(
            &app,
            get_request(&format!("/confirm/{}", confirmation_token(&messages[0]))),
        )
        .await;

        let (status, body) = login(&app, "test@example.net", "1234").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert!(body["access_token"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_register_uses_public_url() {
        let sender = Arc::new(RecordingEmailSender::default());
        let state = test_state_with(crate::api::test_support::test_jwt_config(), sender.clone())
            .with_public_url(Some("https://blog.example.com".to_string()));
        let app = create_router(state, None);

        let request = json_request(
            "POST",
            "/register",
            json!({"email": "test@example.net", "password": "1234"}),
            None,
        );
        send(&app, request).await;

        let messages = sender.wait_for(1).await;
        assert!(messages[0]
            .body
            .contains("https://blog.example.com/confirm/"));
    }
}
