//! Mailgun transactional email sender

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::{DomainError, EmailMessage, EmailSender};
use crate::infrastructure::logging::mask_email;

/// Default Mailgun API base URL
pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";

/// Configuration for the Mailgun sender
#[derive(Debug, Clone)]
pub struct MailgunConfig {
    /// Sending domain registered with Mailgun
    pub domain: String,
    /// Private API key
    pub api_key: String,
    /// API base URL, overridable for regional endpoints and tests
    pub api_base: String,
    /// Display name used in the `From` header
    pub sender_name: String,
    /// Request timeout
    pub timeout: Duration,
}

impl MailgunConfig {
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            api_base: DEFAULT_MAILGUN_API_BASE.to_string(),
            sender_name: "Store API".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.domain
        )
    }

    fn from_address(&self) -> String {
        format!("{} <mailgun@{}>", self.sender_name, self.domain)
    }
}

/// Sends email through the Mailgun HTTP API
#[derive(Debug, Clone)]
pub struct MailgunEmailSender {
    config: MailgunConfig,
    client: Client,
}

impl MailgunEmailSender {
    /// Create a sender with its own HTTP client
    pub fn new(config: MailgunConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl EmailSender for MailgunEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        let subject_preview: String = message.subject.chars().take(20).collect();
        debug!(
            to = %mask_email(&message.to),
            subject = %subject_preview,
            "Sending email"
        );

        let form = [
            ("from", self.config.from_address()),
            ("to", message.to.clone()),
            ("subject", message.subject.clone()),
            ("text", message.body.clone()),
        ];

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| DomainError::email(format!("API request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            return Err(DomainError::email(format!(
                "API request failed with status code: {}",
                status.as_u16()
            )));
        }

        debug!(status = status.as_u16(), "Email accepted by Mailgun");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender_for(server: &MockServer) -> MailgunEmailSender {
        let config = MailgunConfig::new("mg.example.com", "key-123")
            .with_api_base(server.uri())
            .with_sender_name("Store API");
        MailgunEmailSender::new(config).unwrap()
    }

    fn message() -> EmailMessage {
        EmailMessage::new("mary@example.com", "Successfully signed up", "Hello")
    }

    #[test]
    fn test_messages_url() {
        let config =
            MailgunConfig::new("mg.example.com", "key").with_api_base("https://api.eu.mailgun.net/");
        assert_eq!(
            config.messages_url(),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
        assert_eq!(config.from_address(), "Store API <mailgun@mg.example.com>");
    }

    #[tokio::test]
    async fn test_send_posts_form() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mg.example.com/messages"))
            .and(header_exists("authorization"))
            .and(body_string_contains("to=mary%40example.com"))
            .and(body_string_contains("subject=Successfully+signed+up"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = sender_for(&server).send(&message()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_maps_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = sender_for(&server).send(&message()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Email error: API request failed with status code: 401"
        );
    }
}
