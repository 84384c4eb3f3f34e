//! Shared fixtures for HTTP handler tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::api::router::create_router;
use crate::api::state::AppState;
use crate::domain::{DomainError, EmailMessage, EmailSender};
use crate::infrastructure::auth::{JwtConfig, JwtService};
use crate::infrastructure::post::{InMemoryPostRepository, PostService};
use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

pub const TEST_SECRET: &str = "test-secret";

/// Keeps every message instead of delivering it
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub async fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    /// Wait for the background task to hand over the nth message
    pub async fn wait_for(&self, count: usize) -> Vec<EmailMessage> {
        for _ in 0..200 {
            let messages = self.messages().await;
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {} email(s) to be sent", count);
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, 30, 1440)
}

pub fn test_state() -> AppState {
    test_state_with(test_jwt_config(), Arc::new(RecordingEmailSender::default()))
}

pub fn test_state_with(jwt_config: JwtConfig, email_sender: Arc<RecordingEmailSender>) -> AppState {
    let user_service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::insecure_fast()),
    );
    let post_service = PostService::new(Arc::new(InMemoryPostRepository::new()));

    AppState::new(
        Arc::new(user_service),
        Arc::new(post_service),
        Arc::new(JwtService::new(jwt_config)),
        email_sender,
    )
}

/// Router over in-memory state plus the sender it delivers to
pub fn test_app() -> (Router, Arc<RecordingEmailSender>) {
    let sender = Arc::new(RecordingEmailSender::default());
    let state = test_state_with(test_jwt_config(), sender.clone());
    (create_router(state, None), sender)
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "test")
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "test")
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

/// Pull the confirmation token out of the link in a registration email
pub fn confirmation_token(message: &EmailMessage) -> String {
    let (_, token) = message
        .body
        .rsplit_once("/confirm/")
        .expect("registration email should contain a confirmation link");
    token.trim().to_string()
}

pub async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "email": email, "password": password });
    send(app, json_request("POST", "/register", body, None)).await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "email": email, "password": password });
    send(app, json_request("POST", "/token", body, None)).await
}

/// Register, follow the emailed link, and log in; returns an access token
pub async fn confirmed_user_token(
    app: &Router,
    sender: &RecordingEmailSender,
    email: &str,
) -> String {
    let already_sent = sender.messages().await.len();
    let (status, _) = register(app, email, "1234").await;
    assert_eq!(status, StatusCode::CREATED);

    let messages = sender.wait_for(already_sent + 1).await;
    let token = confirmation_token(&messages[already_sent]);
    let (status, _) = send(app, get_request(&format!("/confirm/{}", token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(app, email, "1234").await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}
