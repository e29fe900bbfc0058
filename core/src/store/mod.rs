// src/store/mod.rs

//! Persistence port for orders.
//!
//! A submission runs inside exactly one `OrderTransaction`: header first, then its line
//! items in cart order, then `commit`. Dropping a transaction without committing must
//! discard everything it wrote and release whatever connection it held.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{NewLineItem, NewOrder, OrderId};

pub mod memory;
pub mod postgres;

pub use memory::{FaultPlan, MemoryOrderStore};
pub use postgres::{PgOrderStore, MIGRATOR};

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Acquires a dedicated session and opens a transaction on it.
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>>;
}

#[async_trait]
pub trait OrderTransaction: Send {
  /// Writes the order header and returns the id the store assigned to it.
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderId>;

  async fn insert_line_item(&mut self, order_id: OrderId, item: &NewLineItem) -> StoreResult<()>;

  async fn commit(&mut self) -> StoreResult<()>;

  async fn rollback(&mut self) -> StoreResult<()>;
}
