// src/lib.rs

//! Bakery order intake core.
//!
//! Everything an order submission needs short of the HTTP layer:
//!  - Wire types for the cart/customer payload and the priced write models.
//!  - Deal-aware unit pricing and two-decimal line totals.
//!  - An `OrderStore` port with a Postgres adapter and a transactional in-memory adapter.
//!  - Owner notification: HTML composition, SMTP delivery and a fire-and-forget dispatcher.
//!  - `OrderIntake`, which ties the above into one atomic submission.

pub mod error;
pub mod intake;
pub mod model;
pub mod notify;
pub mod pricing;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{IntakeError, IntakeResult, NotifyError, StoreError, StoreResult, ValidationError};
pub use crate::intake::{IntakeOptions, OrderIntake, OrderReceipt};
pub use crate::model::{
  CartItem, CustomerDetails, NewLineItem, NewOrder, Order, OrderId, OrderLineItem, OrderRequest, ProductRef,
  ANONYMOUS_USER,
};
pub use crate::notify::{
  NotificationComposer, NotificationDispatcher, NotificationWorker, OwnerNotification, OwnerNotifier, SmtpNotifier,
  SmtpSettings,
};
pub use crate::store::{FaultPlan, MemoryOrderStore, OrderStore, OrderTransaction, PgOrderStore, MIGRATOR};
