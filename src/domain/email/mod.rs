//! Email domain
//!
//! Outgoing messages and the sender trait implemented by delivery backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A plain-text email ready to be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Build the message sent after registration, linking to the confirmation URL
    pub fn registration(email: &str, confirmation_url: &str) -> Self {
        Self::new(
            email,
            "Successfully signed up",
            format!(
                "Hi {}! You have successfully signed up.\n\
                 Please confirm your email by clicking on the following link: {}",
                email, confirmation_url
            ),
        )
    }
}

/// Delivers email messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a message, failing with an email error if delivery is rejected
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError>;
}
