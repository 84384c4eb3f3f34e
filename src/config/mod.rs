//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, EmailConfig, EmailProvider, LogFormat, LoggingConfig,
    ServerConfig, StorageBackend,
};
