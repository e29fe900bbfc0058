// src/store/memory.rs

//! Transactional in-memory `OrderStore`.
//!
//! Writes made through a transaction stay private to it until `commit`; rollback or drop
//! discards them. Order ids come from a sequence that, like a Postgres `BIGSERIAL`, is not
//! rewound by a rollback. Faults can be armed to exercise the failure paths of a submission.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::model::{NewLineItem, NewOrder, Order, OrderId, OrderLineItem};
use crate::store::{OrderStore, OrderTransaction};

#[derive(Debug, Default)]
struct MemoryState {
  last_order_id: i64,
  last_item_id: i64,
  orders: Vec<Order>,
  items: Vec<OrderLineItem>,
}

/// Failures to inject into the next transactions.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
  /// `begin` fails as if the database were unreachable.
  pub fail_begin: bool,
  /// The line item insert with this zero-based position within a transaction fails
  /// as a constraint violation.
  pub fail_line_item_at: Option<usize>,
  pub fail_commit: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
  state: Arc<Mutex<MemoryState>>,
  faults: Arc<Mutex<FaultPlan>>,
}

impl MemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_faults(&self, plan: FaultPlan) {
    *self.faults.lock() = plan;
  }

  /// Committed orders, oldest first.
  pub fn orders(&self) -> Vec<Order> {
    self.state.lock().orders.clone()
  }

  pub fn order(&self, order_id: OrderId) -> Option<Order> {
    self.state.lock().orders.iter().find(|o| o.id == order_id).cloned()
  }

  /// Committed line items of one order, in insertion order.
  pub fn line_items(&self, order_id: OrderId) -> Vec<OrderLineItem> {
    self
      .state
      .lock()
      .items
      .iter()
      .filter(|item| item.order_id == order_id)
      .cloned()
      .collect()
  }

  pub fn line_item_count(&self) -> usize {
    self.state.lock().items.len()
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
    let faults = self.faults.lock().clone();
    if faults.fail_begin {
      return Err(StoreError::Unavailable("memory store refused the connection".to_string()));
    }
    Ok(Box::new(MemoryTransaction {
      state: Arc::clone(&self.state),
      faults,
      pending_orders: Vec::new(),
      pending_items: Vec::new(),
      finished: false,
    }))
  }
}

struct MemoryTransaction {
  state: Arc<Mutex<MemoryState>>,
  faults: FaultPlan,
  pending_orders: Vec<Order>,
  pending_items: Vec<(OrderId, NewLineItem)>,
  finished: bool,
}

impl MemoryTransaction {
  fn ensure_open(&self) -> StoreResult<()> {
    if self.finished {
      return Err(StoreError::TransactionFinished);
    }
    Ok(())
  }

  fn discard(&mut self) {
    self.pending_orders.clear();
    self.pending_items.clear();
    self.finished = true;
  }
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderId> {
    self.ensure_open()?;
    let order_id = {
      let mut state = self.state.lock();
      state.last_order_id += 1;
      OrderId(state.last_order_id)
    };

    self.pending_orders.push(Order {
      id: order_id,
      user_id: order.user_id.clone(),
      customer_name: order.customer_name.clone(),
      customer_email: order.customer_email.clone(),
      customer_phone: order.customer_phone.clone(),
      delivery_address: order.delivery_address.clone(),
      order_notes: order.order_notes.clone(),
      subtotal: order.subtotal,
      delivery_fee: order.delivery_fee,
      total_amount: order.total_amount,
      created_at: Utc::now(),
    });
    Ok(order_id)
  }

  async fn insert_line_item(&mut self, order_id: OrderId, item: &NewLineItem) -> StoreResult<()> {
    self.ensure_open()?;
    if !self.pending_orders.iter().any(|o| o.id == order_id) {
      return Err(StoreError::Constraint(format!(
        "order_items.order_id {} references no order in this transaction",
        order_id
      )));
    }
    if self.faults.fail_line_item_at == Some(self.pending_items.len()) {
      return Err(StoreError::Constraint(format!(
        "injected failure on line item '{}'",
        item.product_name
      )));
    }
    self.pending_items.push((order_id, item.clone()));
    Ok(())
  }

  async fn commit(&mut self) -> StoreResult<()> {
    self.ensure_open()?;
    if self.faults.fail_commit {
      self.discard();
      return Err(StoreError::Unavailable("memory store lost the connection during commit".to_string()));
    }

    let mut state = self.state.lock();
    state.orders.append(&mut self.pending_orders);
    for (order_id, item) in self.pending_items.drain(..) {
      state.last_item_id += 1;
      let id = state.last_item_id;
      state.items.push(OrderLineItem {
        id,
        order_id,
        product_id: item.product_id,
        product_name: item.product_name,
        quantity: item.quantity,
        price_per_unit: item.price_per_unit,
        total_price: item.total_price,
      });
    }
    self.finished = true;
    Ok(())
  }

  async fn rollback(&mut self) -> StoreResult<()> {
    self.ensure_open()?;
    self.discard();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  fn header() -> NewOrder {
    NewOrder {
      user_id: "anonymous".into(),
      customer_name: "A".into(),
      customer_email: "a@x.com".into(),
      customer_phone: "1".into(),
      delivery_address: "Addr".into(),
      order_notes: None,
      subtotal: Decimal::new(100, 0),
      delivery_fee: Decimal::new(20, 0),
      total_amount: Decimal::new(120, 0),
    }
  }

  fn line(name: &str) -> NewLineItem {
    NewLineItem {
      product_id: "1".into(),
      product_name: name.into(),
      quantity: 2,
      price_per_unit: Decimal::new(5000, 2),
      total_price: Decimal::new(10000, 2),
    }
  }

  #[tokio::test]
  async fn uncommitted_writes_are_invisible_and_dropped() {
    let store = MemoryOrderStore::new();
    {
      let mut tx = store.begin().await.unwrap();
      let id = tx.insert_order(&header()).await.unwrap();
      tx.insert_line_item(id, &line("Bread")).await.unwrap();
      assert!(store.orders().is_empty());
    }
    assert!(store.orders().is_empty());
    assert_eq!(store.line_item_count(), 0);
  }

  #[tokio::test]
  async fn ids_are_not_reused_after_rollback() {
    let store = MemoryOrderStore::new();

    let mut tx = store.begin().await.unwrap();
    let first = tx.insert_order(&header()).await.unwrap();
    tx.rollback().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let second = tx.insert_order(&header()).await.unwrap();
    tx.commit().await.unwrap();

    assert!(second > first);
    assert_eq!(store.orders().len(), 1);
    assert_eq!(store.orders()[0].id, second);
  }

  #[tokio::test]
  async fn finished_transaction_rejects_further_use() {
    let store = MemoryOrderStore::new();
    let mut tx = store.begin().await.unwrap();
    tx.commit().await.unwrap();
    assert!(matches!(
      tx.insert_order(&header()).await,
      Err(StoreError::TransactionFinished)
    ));
  }

  #[tokio::test]
  async fn injected_line_item_fault_hits_the_requested_position() {
    let store = MemoryOrderStore::new();
    store.set_faults(FaultPlan {
      fail_line_item_at: Some(1),
      ..FaultPlan::default()
    });

    let mut tx = store.begin().await.unwrap();
    let id = tx.insert_order(&header()).await.unwrap();
    assert!(tx.insert_line_item(id, &line("Bread")).await.is_ok());
    assert!(matches!(
      tx.insert_line_item(id, &line("Bun")).await,
      Err(StoreError::Constraint(_))
    ));
  }
}
