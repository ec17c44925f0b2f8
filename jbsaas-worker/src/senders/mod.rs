/// Notification senders
///
/// A sender owns one delivery channel. The processor picks a sender by the
/// notification's `kind` and hands it the payload; everything about how
/// the message actually leaves the building lives behind the trait.
///
/// - `email`: transactional email over the Resend HTTP API
/// - `mock`: records deliveries in memory for tests

pub mod email;
pub mod mock;

pub use email::EmailSender;
pub use mock::MockSender;

use async_trait::async_trait;
use jbsaas_shared::models::Notification;

/// Delivery failure
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Transport-level failure (retryable)
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider rejected the delivery
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Payload is missing fields this sender needs (not retryable, but the
    /// attempt cap bounds the damage either way)
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Delivers notifications over one channel
#[async_trait]
pub trait Sender: Send + Sync {
    /// Channel name, matched against the notification `kind`
    fn name(&self) -> &str;

    /// Delivers the notification
    async fn deliver(&self, notification: &Notification) -> Result<(), SendError>;
}
