// src/notify/mod.rs

//! Owner notification: what gets sent when an order is committed, and how.
//!
//! Delivery is best effort. Nothing in here can fail a submission; the intake hands a
//! composed notification to the `NotificationDispatcher` and moves on.

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::model::OrderId;

pub mod dispatch;
pub mod smtp;
pub mod template;

pub use dispatch::{NotificationDispatcher, NotificationWorker};
pub use smtp::{SmtpNotifier, SmtpSettings};
pub use template::NotificationComposer;

/// A rendered email for the shop owner about one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerNotification {
  pub order_id: OrderId,
  pub subject: String,
  pub html: String,
}

#[async_trait]
pub trait OwnerNotifier: Send + Sync {
  async fn send(&self, notification: &OwnerNotification) -> Result<(), NotifyError>;
}
