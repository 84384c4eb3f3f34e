//! Store API
//!
//! A blogging backend with email-confirmed accounts:
//! - Registration with a signed confirmation link sent by email
//! - Bearer access tokens for writes
//! - Posts, comments and likes over PostgreSQL or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::{AppState, PostServiceTrait, UserServiceTrait};
use config::StorageBackend;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    email::create_email_sender,
    post::{InMemoryPostRepository, PostService, PostgresPostRepository},
    storage::{self, run_storage_migrations, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use rand::Rng;
use sqlx::PgPool;
use tracing::{info, warn};

/// Create the application state with services for the configured backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::new());

    let (user_service, post_service, pool): (
        Arc<dyn UserServiceTrait>,
        Arc<dyn PostServiceTrait>,
        Option<PgPool>,
    ) = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;

            if config.database.run_migrations {
                let applied = run_storage_migrations(&pool).await?;
                info!(applied, "Storage migrations complete");
            }

            (
                Arc::new(UserService::new(
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    hasher,
                )),
                Arc::new(PostService::new(Arc::new(PostgresPostRepository::new(
                    pool.clone(),
                )))),
                Some(pool),
            )
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");

            (
                Arc::new(UserService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    hasher,
                )),
                Arc::new(PostService::new(Arc::new(InMemoryPostRepository::new()))),
                None,
            )
        }
    };

    info!(backend = ?config.database.backend, "Storage initialized");

    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret(config),
        config.auth.access_token_expire_minutes,
        config.auth.confirm_token_expire_minutes,
    )));
    let email_sender = create_email_sender(&config.email)?;

    let mut state = AppState::new(user_service, post_service, jwt_service, email_sender)
        .with_public_url(config.server.public_url.clone())
        .with_fallback_base_url(format!(
            "http://{}:{}",
            config.server.host, config.server.port
        ));

    if let Some(pool) = pool {
        state = state.with_db_pool(pool);
    }

    Ok(state)
}

/// Open the PostgreSQL pool named by configuration or `DATABASE_URL`
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database
        .resolved_url()
        .context("database.url or DATABASE_URL is required for the postgres backend")?;

    info!("Connecting to PostgreSQL...");
    let pool = storage::connect(
        &PostgresConfig::new(url).with_max_connections(config.database.max_connections),
    )
    .await?;
    info!("PostgreSQL connection established");

    Ok(pool)
}

fn jwt_secret(config: &AppConfig) -> String {
    config
        .auth
        .secret_key
        .clone()
        .filter(|secret| !secret.is_empty())
        .unwrap_or_else(|| {
            warn!(
                "No auth.secret_key configured. Generating random secret. \
                 Tokens will NOT survive a restart."
            );
            generate_random_secret()
        })
}

/// Generate a random signing secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
