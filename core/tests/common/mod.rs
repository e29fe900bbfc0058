// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use bakery_core::{
  IntakeOptions, MemoryOrderStore, NotificationDispatcher, NotificationWorker, NotifyError, OrderIntake,
  OrderRequest, OwnerNotification, OwnerNotifier,
};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Notifiers ---

/// Keeps every notification it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
  pub sent: Mutex<Vec<OwnerNotification>>,
}

impl RecordingNotifier {
  pub fn sent(&self) -> Vec<OwnerNotification> {
    self.sent.lock().clone()
  }
}

#[async_trait]
impl OwnerNotifier for RecordingNotifier {
  async fn send(&self, notification: &OwnerNotification) -> Result<(), NotifyError> {
    self.sent.lock().push(notification.clone());
    Ok(())
  }
}

/// Fails every send, counting the attempts.
#[derive(Default)]
pub struct FailingNotifier {
  pub attempts: AtomicUsize,
}

impl FailingNotifier {
  pub fn attempts(&self) -> usize {
    self.attempts.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl OwnerNotifier for FailingNotifier {
  async fn send(&self, _notification: &OwnerNotification) -> Result<(), NotifyError> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    Err(NotifyError::Rejected("421 service not available".to_string()))
  }
}

// --- Harness ---

pub struct Harness {
  pub intake: Arc<OrderIntake>,
  pub store: MemoryOrderStore,
  pub worker: NotificationWorker,
}

impl Harness {
  pub fn new(notifier: Arc<dyn OwnerNotifier>, options: IntakeOptions) -> Self {
    let store = MemoryOrderStore::new();
    let (dispatcher, worker) = NotificationDispatcher::spawn(notifier);
    let intake = OrderIntake::new(Arc::new(store.clone()), dispatcher, options).expect("template compiles");
    Self {
      intake: Arc::new(intake),
      store,
      worker,
    }
  }

  /// Waits until every queued notification has been attempted.
  pub async fn drain_notifications(self) -> MemoryOrderStore {
    self.worker.shutdown(Duration::from_secs(5)).await;
    self.store
  }
}

// --- Payloads ---

/// The storefront's canonical single-loaf order: 2 x Bread @ 50.00, delivery 20.
pub fn bread_order_json() -> serde_json::Value {
  serde_json::json!({
    "customer_details": {"name": "A", "email": "a@x.com", "phone": "1", "addressLine": "Addr"},
    "cart_items": [{"id": 1, "name": "Bread", "quantity": 2, "price": "50.00", "isDeal": false}],
    "subtotal": 100,
    "delivery_fee": 20,
    "total": 120
  })
}

pub fn request_from(value: serde_json::Value) -> OrderRequest {
  serde_json::from_value(value).expect("test payload should deserialize")
}

pub fn bread_order() -> OrderRequest {
  request_from(bread_order_json())
}

pub fn dec(s: &str) -> rust_decimal::Decimal {
  s.parse().expect("valid decimal literal")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
