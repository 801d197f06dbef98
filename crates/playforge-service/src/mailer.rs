//! Purchase notification mail.
//!
//! Notifications are best-effort: the purchase has already committed by the
//! time mail is dispatched, so failures are logged and never surfaced to the
//! buyer.

use serde::Serialize;

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// The HTTP request failed.
    #[error("mail request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail API returned a non-success status.
    #[error("mail API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Outbound message payload.
#[derive(Debug, Serialize)]
struct Message<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Client for the outbound mail API.
pub struct Mailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    /// Create a new mailer.
    #[must_use]
    pub fn new(api_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }

    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let message = Message {
            from: &self.from,
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailerError::Status(response.status()));
        }

        tracing::debug!(to = %to, subject = %subject, "Notification mail sent");
        Ok(())
    }
}
