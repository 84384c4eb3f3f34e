//! Email infrastructure module
//!
//! Mailgun delivery, a logging fallback for development, and
//! fire-and-forget dispatch used by the registration flow.

mod log_sender;
mod mailgun;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use log_sender::LogEmailSender;
pub use mailgun::{MailgunConfig, MailgunEmailSender, DEFAULT_MAILGUN_API_BASE};

use crate::config::{EmailConfig, EmailProvider};
use crate::domain::{DomainError, EmailMessage, EmailSender};
use crate::infrastructure::logging::mask_email;
use crate::infrastructure::observability::record_email_sent;

/// Build the sender selected by configuration
pub fn create_email_sender(config: &EmailConfig) -> Result<Arc<dyn EmailSender>, DomainError> {
    if config.provider == EmailProvider::Log {
        info!("Using log email provider");
        return Ok(Arc::new(LogEmailSender::new()));
    }

    let (Some(domain), Some(api_key)) = (
        config.mailgun_domain.as_deref().filter(|d| !d.is_empty()),
        config.mailgun_api_key.as_deref().filter(|k| !k.is_empty()),
    ) else {
        warn!("Mailgun domain or API key not configured, falling back to log email provider");
        return Ok(Arc::new(LogEmailSender::new()));
    };

    let mailgun = MailgunConfig::new(domain, api_key)
        .with_api_base(config.mailgun_api_base.clone())
        .with_sender_name(config.sender_name.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs));

    info!(domain = %domain, "Using Mailgun email provider");
    Ok(Arc::new(MailgunEmailSender::new(mailgun)?))
}

/// Send a message on a background task; failures are logged, never returned
pub fn dispatch_in_background(
    sender: Arc<dyn EmailSender>,
    message: EmailMessage,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sender.send(&message).await {
            Ok(()) => {
                record_email_sent(true);
                info!(to = %mask_email(&message.to), "Email sent");
            }
            Err(e) => {
                record_email_sent(false);
                error!(to = %mask_email(&message.to), error = %e, "Failed to send email");
            }
        }
    })
}
