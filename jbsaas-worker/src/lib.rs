//! # JBSAAS Notification Worker Library
//!
//! This library provides the delivery loop for the notification queue.
//!
//! ## Modules
//!
//! - `queue`: claims due notifications with `FOR UPDATE SKIP LOCKED`
//! - `processor`: the delivery loop and failure accounting
//! - `senders`: delivery channels (email, mock)
//!
//! ## Example
//!
//! ```no_run
//! use jbsaas_worker::processor::Processor;
//! use jbsaas_worker::queue::NotificationQueue;
//! use jbsaas_worker::senders::MockSender;
//! use std::sync::Arc;
//!
//! # async fn example(pool: sqlx::PgPool) -> anyhow::Result<()> {
//! let mut processor = Processor::new(NotificationQueue::new(pool));
//! processor.register_sender(Arc::new(MockSender::new("email")));
//! processor.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod processor;
pub mod queue;
pub mod senders;
