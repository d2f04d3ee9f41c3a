//! Outbound email via the Resend HTTP API
//!
//! The mailer is the notification channel of the lifecycle manager:
//! destination, subject, body in; delivery success or failure out. Flows
//! that must not block on delivery submit through `dispatch`, which spawns
//! the send after the state transition has already committed and reports
//! failure on the log, never to the HTTP caller.

use serde::Serialize;
use thiserror::Error;

const RESEND_API_BASE: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("email delivery is not configured (missing RESEND_API_KEY)")]
    NotConfigured,
    #[error("email API request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("email API rejected the message: {status}")]
    Rejected { status: u16 },
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_key: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: RESEND_API_BASE.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }

    /// Point the mailer at a different API base (tests use a mock server)
    #[cfg(test)]
    fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send one message and wait for the delivery verdict
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        if !self.is_enabled() {
            return Err(MailerError::NotConfigured);
        }

        let response = self
            .client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&SendEmailBody {
                from: &self.from,
                to: [to],
                subject,
                html,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailerError::Rejected {
                status: response.status().as_u16(),
            });
        }

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }

    /// Fire-and-forget send, submitted after a state transition commits
    ///
    /// Delivery failure is a warning on its own channel; the transition
    /// that queued the message has already succeeded and stays succeeded.
    pub fn dispatch(&self, to: String, subject: String, html: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, &subject, &html).await {
                tracing::warn!(to = %to, subject = %subject, error = %e, "Email delivery failed after committed transition");
            }
        });
    }
}

/// Verification email: subject and body carrying the raw token link
pub fn verification_email(client_url: &str, raw_token: &str) -> (String, String) {
    let url = format!("{client_url}/auth/verify-email?token={raw_token}");
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Verify Your Email</h2>\
         <p>Click the following link to verify your email:</p>\
         <p><a href=\"{url}\">{url}</a></p>\
         <p>This link will expire in 24 hours.</p>\
         </div>"
    );
    ("Verify Your Email".to_string(), html)
}

/// Password-reset email: subject and body carrying the raw token link
pub fn reset_email(client_url: &str, raw_token: &str) -> (String, String) {
    let url = format!("{client_url}/auth/reset-password?token={raw_token}");
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Password Reset Request</h2>\
         <p>You requested a password reset. Click the button below to reset your password:</p>\
         <p><a href=\"{url}\" style=\"background-color:#007bff;color:white;padding:10px 20px;text-decoration:none;border-radius:5px;\">Reset Password</a></p>\
         <p>This link will expire in 30 minutes.</p>\
         </div>"
    );
    ("Password Reset Request".to_string(), html)
}
