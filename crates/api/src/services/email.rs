//! Outbound email delivery.
//!
//! Supports two providers: `console` (logs the message, for development) and
//! `sendgrid` (HTTP API). Delivery failures are reported to the caller but
//! are not supposed to fail the surrounding request; callers log and move on.

use serde_json::json;
use thiserror::Error;

use crate::config::EmailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email provider request failed: {0}")]
    Request(String),

    #[error("Email provider rejected the message: status {0}")]
    Rejected(u16),

    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),
}

/// Email service dispatching to the configured provider.
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Sends an affiliate invitation email.
    pub async fn send_invite_email(
        &self,
        to: &str,
        tenant_name: &str,
        invite_url: &str,
    ) -> Result<(), EmailError> {
        let subject = format!("You've been invited to join {}", tenant_name);
        let body = format!(
            "Hello,\n\n{} has invited you to join their affiliate program.\n\n\
             Accept your invitation here: {}\n\n\
             This invitation expires in 7 days.\n",
            tenant_name, invite_url
        );

        self.send(to, &subject, &body).await
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if !self.config.enabled {
            tracing::debug!(to = %to, subject = %subject, "Email sending disabled, skipping");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                tracing::info!(
                    to = %to,
                    subject = %subject,
                    body = %body,
                    "Email (console provider)"
                );
                Ok(())
            }
            "sendgrid" => self.send_via_sendgrid(to, subject, body).await,
            other => Err(EmailError::UnknownProvider(other.to_string())),
        }
    }

    async fn send_via_sendgrid(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }]
        });

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmailError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}
