//! Log filtering and redaction helpers

use tracing_subscriber::EnvFilter;

const VISIBLE_EMAIL_PREFIX: usize = 3;

/// `RUST_LOG` wins over the configured level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Shorten an email address for log output
pub fn mask_email(email: &str) -> String {
    let prefix: String = email.chars().take(VISIBLE_EMAIL_PREFIX).collect();
    format!("{}***", prefix)
}
