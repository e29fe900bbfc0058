// src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::error::ValidationError;
use crate::model::request::{CustomerDetails, OrderRequest};

/// Recorded as the submitting user when the client sends none.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Store-assigned order identifier (`orders.id`, a `BIGSERIAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Order header as written by a submission. Totals are the caller's figures.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub user_id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub delivery_address: String,
  pub order_notes: Option<String>,
  pub subtotal: Decimal,
  pub delivery_fee: Decimal,
  pub total_amount: Decimal,
}

impl NewOrder {
  /// Builds the header row from a request, rejecting blank required customer fields.
  pub fn from_request(request: &OrderRequest) -> Result<Self, ValidationError> {
    let CustomerDetails {
      name,
      email,
      phone,
      address_line,
      notes,
    } = &request.customer_details;

    let required = |field: &'static str, value: &str| {
      if value.trim().is_empty() {
        Err(ValidationError::MissingCustomerField { field })
      } else {
        Ok(value.to_string())
      }
    };

    let user_id = match request.user_id.as_deref().map(str::trim) {
      Some(id) if !id.is_empty() => id.to_string(),
      _ => ANONYMOUS_USER.to_string(),
    };

    Ok(Self {
      user_id,
      customer_name: required("name", name)?,
      customer_email: required("email", email)?,
      customer_phone: required("phone", phone)?,
      delivery_address: required("addressLine", address_line)?,
      order_notes: notes.clone(),
      subtotal: request.subtotal,
      delivery_fee: request.delivery_fee,
      total_amount: request.total,
    })
  }
}

/// A persisted `orders` row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: OrderId,
  pub user_id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub delivery_address: String,
  pub order_notes: Option<String>,
  pub subtotal: Decimal,
  pub delivery_fee: Decimal,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
}
