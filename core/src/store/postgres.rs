// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::{NewLineItem, NewOrder, Order, OrderId, OrderLineItem};
use crate::store::{OrderStore, OrderTransaction};

/// Schema for `orders` and `order_items`, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const INSERT_ORDER_SQL: &str = r#"
  INSERT INTO orders
    (user_id, customer_name, customer_email, customer_phone, delivery_address, order_notes, subtotal, delivery_fee, total_amount)
  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
  RETURNING id
"#;

const INSERT_LINE_ITEM_SQL: &str = r#"
  INSERT INTO order_items (order_id, product_id, product_name, quantity, price_per_unit, total_price)
  VALUES ($1, $2, $3, $4, $5, $6)
"#;

/// `OrderStore` backed by a shared Postgres pool.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  pub async fn fetch_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
      "SELECT id, user_id, customer_name, customer_email, customer_phone, delivery_address, order_notes, \
       subtotal, delivery_fee, total_amount, created_at FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }

  /// Line items of an order in insertion order.
  pub async fn fetch_line_items(&self, order_id: OrderId) -> StoreResult<Vec<OrderLineItem>> {
    let items = sqlx::query_as::<_, OrderLineItem>(
      "SELECT id, order_id, product_id, product_name, quantity, price_per_unit, total_price \
       FROM order_items WHERE order_id = $1 ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(items)
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgOrderTransaction { tx: Some(tx) }))
  }
}

/// One pooled connection with an open transaction. The connection goes back to the pool
/// when this is committed, rolled back or dropped (sqlx rolls back on drop).
pub struct PgOrderTransaction {
  tx: Option<Transaction<'static, Postgres>>,
}

impl PgOrderTransaction {
  fn active(&mut self) -> StoreResult<&mut Transaction<'static, Postgres>> {
    self.tx.as_mut().ok_or(StoreError::TransactionFinished)
  }
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<OrderId> {
    let tx = self.active()?;
    let order_id: OrderId = sqlx::query_scalar(INSERT_ORDER_SQL)
      .bind(&order.user_id)
      .bind(&order.customer_name)
      .bind(&order.customer_email)
      .bind(&order.customer_phone)
      .bind(&order.delivery_address)
      .bind(&order.order_notes)
      .bind(order.subtotal)
      .bind(order.delivery_fee)
      .bind(order.total_amount)
      .fetch_one(&mut **tx)
      .await?;
    debug!(%order_id, "Inserted order header");
    Ok(order_id)
  }

  async fn insert_line_item(&mut self, order_id: OrderId, item: &NewLineItem) -> StoreResult<()> {
    let tx = self.active()?;
    sqlx::query(INSERT_LINE_ITEM_SQL)
      .bind(order_id)
      .bind(&item.product_id)
      .bind(&item.product_name)
      .bind(item.quantity)
      .bind(item.price_per_unit)
      .bind(item.total_price)
      .execute(&mut **tx)
      .await?;
    Ok(())
  }

  async fn commit(&mut self) -> StoreResult<()> {
    let tx = self.tx.take().ok_or(StoreError::TransactionFinished)?;
    tx.commit().await?;
    Ok(())
  }

  async fn rollback(&mut self) -> StoreResult<()> {
    let tx = self.tx.take().ok_or(StoreError::TransactionFinished)?;
    tx.rollback().await?;
    Ok(())
  }
}
