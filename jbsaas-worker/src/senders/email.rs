/// Transactional email sender
///
/// Delivers `email` notifications through the Resend HTTP API. The payload
/// must carry `to`, `subject`, and `html`; a payload without them fails
/// the attempt rather than the whole worker.

use async_trait::async_trait;
use jbsaas_shared::models::Notification;
use serde::{Deserialize, Serialize};

use super::{SendError, Sender};

const RESEND_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_FROM: &str = "JBSAAS <notifications@jbsaas.com.au>";

/// Resend API email sender
pub struct EmailSender {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    from: String,
}

/// Expected email payload shape
#[derive(Debug, Deserialize)]
struct EmailPayload {
    to: String,
    subject: String,
    html: String,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

impl EmailSender {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: RESEND_BASE_URL.to_string(),
            from: DEFAULT_FROM.to_string(),
        }
    }

    /// Overrides the base URL (test server)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl Sender for EmailSender {
    fn name(&self) -> &str {
        "email"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), SendError> {
        let payload: EmailPayload = serde_json::from_value(notification.payload.clone())
            .map_err(|e| SendError::InvalidPayload(e.to_string()))?;

        let body = ResendRequest {
            from: &self.from,
            to: vec![&payload.to],
            subject: &payload.subject,
            html: &payload.html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(notification_id = %notification.id, to = %payload.to, "Email delivered");
        Ok(())
    }
}
