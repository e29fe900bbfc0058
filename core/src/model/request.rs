// src/model/request.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /api/orders`.
///
/// Top-level fields are snake case, nested customer and cart fields are camel case,
/// matching what the storefront sends. Money fields accept JSON numbers or numeric strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
  #[serde(default)]
  pub user_id: Option<String>,
  pub customer_details: CustomerDetails,
  pub cart_items: Vec<CartItem>,
  pub subtotal: Decimal,
  pub delivery_fee: Decimal,
  pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub address_line: String,
  #[serde(default)]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: ProductRef,
  pub name: String,
  pub quantity: i32,
  pub price: Decimal,
  #[serde(default)]
  pub is_deal: bool,
  #[serde(default)]
  pub discount_price: Option<Decimal>,
}

/// Catalogue identifier as sent by the client. The storefront uses both numeric and
/// slug-style ids; either way it is stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
  Number(i64),
  Text(String),
}

impl fmt::Display for ProductRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProductRef::Number(n) => write!(f, "{}", n),
      ProductRef::Text(s) => f.write_str(s),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
  }

  #[test]
  fn deserializes_storefront_payload_with_string_and_number_money() {
    let body = serde_json::json!({
      "customer_details": {"name": "A", "email": "a@x.com", "phone": "1", "addressLine": "Addr"},
      "cart_items": [
        {"id": 1, "name": "Bread", "quantity": 2, "price": "50.00", "isDeal": false},
        {"id": "croissant-box", "name": "Croissants", "quantity": 1, "price": 120, "isDeal": true, "discountPrice": 99.5}
      ],
      "subtotal": 100,
      "delivery_fee": 20,
      "total": 120
    });

    let request: OrderRequest = serde_json::from_value(body).expect("payload should deserialize");

    assert_eq!(request.user_id, None);
    assert_eq!(request.customer_details.address_line, "Addr");
    assert_eq!(request.customer_details.notes, None);
    assert_eq!(request.cart_items[0].id, ProductRef::Number(1));
    assert_eq!(request.cart_items[0].price, dec("50.00"));
    assert!(!request.cart_items[0].is_deal);
    assert_eq!(request.cart_items[0].discount_price, None);
    assert_eq!(request.cart_items[1].id, ProductRef::Text("croissant-box".to_string()));
    assert_eq!(request.cart_items[1].discount_price, Some(dec("99.5")));
    assert_eq!(request.total, dec("120"));
  }

  #[test]
  fn missing_customer_details_is_rejected() {
    let body = serde_json::json!({
      "cart_items": [],
      "subtotal": 0,
      "delivery_fee": 0,
      "total": 0
    });
    assert!(serde_json::from_value::<OrderRequest>(body).is_err());
  }

  #[test]
  fn product_ref_displays_as_stored_text() {
    assert_eq!(ProductRef::Number(42).to_string(), "42");
    assert_eq!(ProductRef::Text("sourdough".into()).to_string(), "sourdough");
  }
}
