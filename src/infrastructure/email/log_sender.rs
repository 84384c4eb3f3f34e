//! Development sender that writes messages to the log

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{DomainError, EmailMessage, EmailSender};
use crate::infrastructure::logging::mask_email;

/// Logs each message instead of delivering it
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

impl LogEmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), DomainError> {
        info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            "Email not delivered (log provider)"
        );
        // The body holds a live confirmation link
        debug!(body = %message.body, "Undelivered email body");
        Ok(())
    }
}
