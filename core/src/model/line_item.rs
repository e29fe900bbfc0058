// src/model/line_item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::model::order::OrderId;

/// A priced cart entry ready to be written under its order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
  pub product_id: String,
  pub product_name: String,
  pub quantity: i32,
  pub price_per_unit: Decimal,
  pub total_price: Decimal,
}

/// A persisted `order_items` row. Immutable once written.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLineItem {
  pub id: i64,
  pub order_id: OrderId,
  pub product_id: String,
  pub product_name: String,
  pub quantity: i32,
  pub price_per_unit: Decimal,
  pub total_price: Decimal,
}
