// src/notify/dispatch.rs

//! Fire-and-forget delivery of owner notifications.
//!
//! Request handlers push into an unbounded channel and return immediately. A single worker
//! task owns the receiving end and runs every delivery in its own task. On shutdown the
//! worker stops taking new notifications, finishes what is queued or in flight, and is
//! abandoned (with a warning) if that takes longer than the grace period.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::notify::{OwnerNotification, OwnerNotifier};

/// Cheap, cloneable handle used by the intake to queue notifications.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
  tx: mpsc::UnboundedSender<OwnerNotification>,
}

impl NotificationDispatcher {
  /// Starts the worker on the current tokio runtime.
  pub fn spawn(notifier: Arc<dyn OwnerNotifier>) -> (Self, NotificationWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(run_worker(notifier, rx, shutdown_rx));
    (
      Self { tx },
      NotificationWorker {
        shutdown: Some(shutdown_tx),
        handle,
      },
    )
  }

  /// Queues a notification. Never blocks and never fails the caller.
  pub fn dispatch(&self, notification: OwnerNotification) {
    if let Err(mpsc::error::SendError(rejected)) = self.tx.send(notification) {
      warn!(
        order_id = %rejected.order_id,
        "Notification worker has shut down; owner notification dropped."
      );
    }
  }
}

/// Owns the background worker so the process can drain it on the way out.
pub struct NotificationWorker {
  shutdown: Option<oneshot::Sender<()>>,
  handle: JoinHandle<()>,
}

impl NotificationWorker {
  pub async fn shutdown(mut self, grace: Duration) {
    if let Some(signal) = self.shutdown.take() {
      let _ = signal.send(());
    }

    match tokio::time::timeout(grace, &mut self.handle).await {
      Ok(Ok(())) => info!("Notification worker drained."),
      Ok(Err(join_err)) => error!(error = %join_err, "Notification worker terminated abnormally."),
      Err(_) => {
        warn!(
          grace_ms = grace.as_millis() as u64,
          "Notification worker did not drain within the grace period; pending owner notifications abandoned."
        );
        self.handle.abort();
      }
    }
  }
}

async fn run_worker(
  notifier: Arc<dyn OwnerNotifier>,
  mut rx: mpsc::UnboundedReceiver<OwnerNotification>,
  mut shutdown_rx: oneshot::Receiver<()>,
) {
  let mut in_flight = JoinSet::new();

  loop {
    tokio::select! {
      received = rx.recv() => match received {
        Some(notification) => {
          in_flight.spawn(deliver(Arc::clone(&notifier), notification));
        }
        None => break,
      },
      Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
      _ = &mut shutdown_rx => {
        rx.close();
        while let Some(notification) = rx.recv().await {
          in_flight.spawn(deliver(Arc::clone(&notifier), notification));
        }
        break;
      }
    }
  }

  if !in_flight.is_empty() {
    debug!(pending = in_flight.len(), "Waiting for in-flight owner notifications.");
  }
  while in_flight.join_next().await.is_some() {}
}

async fn deliver(notifier: Arc<dyn OwnerNotifier>, notification: OwnerNotification) {
  match notifier.send(&notification).await {
    Ok(()) => info!(order_id = %notification.order_id, "Owner notification sent."),
    // Logged only; the order is already committed and nothing is retried.
    Err(e) => error!(order_id = %notification.order_id, error = %e, "Failed to send owner notification."),
  }
}
