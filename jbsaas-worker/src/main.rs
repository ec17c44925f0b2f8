//! # JBSAAS Notification Worker
//!
//! Delivers queued notifications (email and friends) claimed from the
//! database with `FOR UPDATE SKIP LOCKED`, with bounded retries and a
//! terminal `failed` state after the attempt cap.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p jbsaas-worker
//! ```

use jbsaas_worker::{
    processor::Processor,
    queue::NotificationQueue,
    senders::{EmailSender, MockSender, Sender},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jbsaas_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "JBSAAS Notification Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = jbsaas_shared::db::create_pool(jbsaas_shared::db::DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;

    jbsaas_shared::db::run_migrations(&pool).await?;

    let email: Arc<dyn Sender> = match std::env::var("RESEND_API_KEY") {
        Ok(key) => Arc::new(EmailSender::new(key)),
        Err(_) => {
            tracing::warn!("RESEND_API_KEY not set; using mock email sender");
            Arc::new(MockSender::new("email"))
        }
    };

    let mut processor = Processor::new(NotificationQueue::new(pool));
    processor.register_sender(email);

    let shutdown_token = processor.shutdown_token();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    processor.run().await?;

    tracing::info!("Worker stopped");
    Ok(())
}
