/// Notification processor
///
/// The worker's main loop: claim due notifications, dispatch each to the
/// sender registered for its kind, and record the outcome. Retry delays
/// follow the shared policy (base × 2^(attempt − 1)) but are written into
/// `scheduled_for` rather than slept on, so one slow channel never stalls
/// the loop.
///
/// # Shutdown
///
/// The processor polls a `CancellationToken` between batches. In-flight
/// deliveries finish; nothing new is claimed after cancellation.

use jbsaas_shared::retry::RetryPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::queue::NotificationQueue;
use crate::senders::Sender;

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Seconds between polls when the queue is empty
    pub poll_interval_secs: u64,

    /// Maximum notifications claimed per batch
    pub batch_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            batch_size: 10,
        }
    }
}

/// Notification processor
pub struct Processor {
    queue: NotificationQueue,
    senders: HashMap<String, Arc<dyn Sender>>,
    retry_policy: RetryPolicy,
    config: ProcessorConfig,
    shutdown_token: CancellationToken,
}

impl Processor {
    /// Creates a processor with default configuration
    pub fn new(queue: NotificationQueue) -> Self {
        Self::with_config(queue, ProcessorConfig::default())
    }

    /// Creates a processor with custom configuration
    pub fn with_config(queue: NotificationQueue, config: ProcessorConfig) -> Self {
        Self {
            queue,
            senders: HashMap::new(),
            retry_policy: RetryPolicy::default(),
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Registers a sender for its channel
    pub fn register_sender(&mut self, sender: Arc<dyn Sender>) {
        let name = sender.name().to_string();
        tracing::info!(sender = %name, "Registering sender");
        self.senders.insert(name, sender);
    }

    /// Gets the shutdown token
    ///
    /// Used to signal graceful shutdown from external handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the delivery loop until shutdown
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            batch_size = self.config.batch_size,
            poll_interval_secs = self.config.poll_interval_secs,
            "Notification processor starting"
        );

        loop {
            if self.shutdown_token.is_cancelled() {
                tracing::info!("Shutdown requested, notification processor stopping");
                break;
            }

            let batch = match self.queue.claim_due(Some(self.config.batch_size)).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim notifications");
                    sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
                    continue;
                }
            };

            if batch.is_empty() {
                sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
                continue;
            }

            tracing::debug!(count = batch.len(), "Claimed notifications");

            for notification in batch {
                self.process_one(notification).await;
            }
        }

        Ok(())
    }

    /// Delivers one notification and records the outcome
    async fn process_one(&self, notification: jbsaas_shared::models::Notification) {
        let id = notification.id;
        let kind = notification.kind.clone();

        let Some(sender) = self.senders.get(&kind) else {
            // No channel for this kind; burn an attempt so the row cannot
            // loop forever on a misconfigured deployment
            tracing::error!(notification_id = %id, kind = %kind, "No sender for kind");
            self.record_failure(
                id,
                notification.attempts,
                &format!("No sender for kind: {}", kind),
            )
            .await;
            return;
        };

        match sender.deliver(&notification).await {
            Ok(()) => {
                if let Err(e) = self.queue.mark_sent(id).await {
                    tracing::error!(notification_id = %id, error = %e, "Failed to mark sent");
                } else {
                    tracing::info!(notification_id = %id, kind = %kind, "Notification delivered");
                }
            }
            Err(e) => {
                tracing::warn!(notification_id = %id, kind = %kind, error = %e, "Delivery failed");
                self.record_failure(id, notification.attempts, &e.to_string())
                    .await;
            }
        }
    }

    /// Records a failure with the policy's backoff written into the schedule
    async fn record_failure(&self, id: uuid::Uuid, prior_attempts: i32, error: &str) {
        // The attempt being recorded is prior_attempts + 1 (1-based)
        let attempt = (prior_attempts + 1).max(1) as u32;
        let retry_at = chrono::Utc::now()
            + chrono::Duration::from_std(self.retry_policy.delay_for(attempt))
                .unwrap_or_else(|_| chrono::Duration::seconds(1));

        match self.queue.record_failure(id, error, retry_at).await {
            Ok(record) if record.exhausted => {
                tracing::error!(
                    notification_id = %id,
                    attempts = record.attempts,
                    "Notification exhausted attempts, marked failed"
                );
            }
            Ok(record) => {
                tracing::debug!(
                    notification_id = %id,
                    attempts = record.attempts,
                    "Notification will be retried"
                );
            }
            Err(e) => {
                tracing::error!(notification_id = %id, error = %e, "Failed to record failure");
            }
        }
    }
}
