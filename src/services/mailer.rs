use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::config;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email sender is not configured")]
    NotConfigured,

    #[error("SendGrid request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SendGrid rejected the message: status {0}")]
    Rejected(u16),
}

/// Outbound mail over the SendGrid v3 API
pub struct Mailer {
    client: Client,
}

impl Mailer {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let email_config = &config::config().email;

        if email_config.sendgrid_api_key.is_empty() || email_config.from_address.is_empty() {
            return Err(MailError::NotConfigured);
        }

        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": email_config.from_address },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&email_config.sendgrid_api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        info!("Email sent to {}", to);
        Ok(())
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}
