// tests/postgres_store_tests.rs
//
// Runs against a real database when TEST_DATABASE_URL is set; otherwise every test
// returns early. The schema is applied with the embedded migrations.
mod common;
use common::*;

use bakery_core::{
  IntakeOptions, NewLineItem, NotificationDispatcher, OrderIntake, OrderStore, PgOrderStore, MIGRATOR,
};
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

async fn test_store() -> Option<PgOrderStore> {
  let url = match std::env::var("TEST_DATABASE_URL") {
    Ok(url) => url,
    Err(_) => {
      eprintln!("TEST_DATABASE_URL not set; skipping Postgres store test");
      return None;
    }
  };
  let pool = PgPool::connect(&url).await.expect("test database should be reachable");
  MIGRATOR.run(&pool).await.expect("migrations should apply");
  Some(PgOrderStore::new(pool))
}

#[tokio::test]
#[serial]
async fn committed_order_matches_the_submission() {
  setup_tracing();
  let Some(store) = test_store().await else { return };
  let notifier = Arc::new(RecordingNotifier::default());
  let (dispatcher, worker) = NotificationDispatcher::spawn(notifier.clone());
  let intake = OrderIntake::new(Arc::new(store.clone()), dispatcher, IntakeOptions::default()).unwrap();

  let receipt = intake.submit(&bread_order()).await.unwrap();
  worker.shutdown(Duration::from_secs(5)).await;

  let order = store.fetch_order(receipt.order_id).await.unwrap().expect("order row");
  assert_eq!(order.customer_name, "A");
  assert_eq!(order.user_id, "anonymous");
  assert_eq!(order.total_amount, dec("120"));

  let items = store.fetch_line_items(receipt.order_id).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].product_name, "Bread");
  assert_eq!(items[0].price_per_unit, dec("50.00"));
  assert_eq!(items[0].total_price.to_string(), "100.00");
  assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
#[serial]
async fn stored_line_total_is_stored_unit_price_times_quantity() {
  setup_tracing();
  let Some(store) = test_store().await else { return };
  let (dispatcher, worker) = NotificationDispatcher::spawn(Arc::new(RecordingNotifier::default()));
  let intake = OrderIntake::new(Arc::new(store.clone()), dispatcher, IntakeOptions::default()).unwrap();

  let request = request_from(serde_json::json!({
    "customer_details": {"name": "B", "email": "b@x.com", "phone": "2", "addressLine": "Lane 4"},
    "cart_items": [
      {"id": 3, "name": "Baguette", "quantity": 3, "price": "33.333", "isDeal": false},
      {"id": 4, "name": "Tart", "quantity": 2, "price": "0.125", "isDeal": false}
    ],
    "subtotal": "100.25",
    "delivery_fee": "0",
    "total": "100.25"
  }));
  let receipt = intake.submit(&request).await.unwrap();
  worker.shutdown(Duration::from_secs(5)).await;

  let items = store.fetch_line_items(receipt.order_id).await.unwrap();
  assert_eq!(items.len(), 2);
  for item in &items {
    let expected = (item.price_per_unit * rust_decimal::Decimal::from(item.quantity))
      .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(item.total_price, expected, "stored total for {}", item.product_name);
  }
  assert_eq!(items[0].price_per_unit, dec("33.33"));
  assert_eq!(items[0].total_price, dec("99.99"));
  assert_eq!(items[1].price_per_unit, dec("0.13"));
  assert_eq!(items[1].total_price, dec("0.26"));
}

#[tokio::test]
#[serial]
async fn constraint_violation_on_an_item_rolls_back_the_header() {
  setup_tracing();
  let Some(store) = test_store().await else { return };

  let header = bakery_core::NewOrder::from_request(&bread_order()).unwrap();
  let good = NewLineItem {
    product_id: "1".into(),
    product_name: "Bread".into(),
    quantity: 2,
    price_per_unit: dec("50.00"),
    total_price: dec("100.00"),
  };
  // Violates CHECK (quantity > 0).
  let bad = NewLineItem {
    quantity: 0,
    total_price: dec("0.00"),
    ..good.clone()
  };

  let mut tx = store.begin().await.unwrap();
  let order_id = tx.insert_order(&header).await.unwrap();
  tx.insert_line_item(order_id, &good).await.unwrap();
  assert!(tx.insert_line_item(order_id, &bad).await.is_err());
  // Postgres has aborted the transaction; rolling back must still succeed.
  tx.rollback().await.unwrap();

  assert!(store.fetch_order(order_id).await.unwrap().is_none());
  assert!(store.fetch_line_items(order_id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn dropped_transaction_is_rolled_back() {
  setup_tracing();
  let Some(store) = test_store().await else { return };
  let header = bakery_core::NewOrder::from_request(&bread_order()).unwrap();

  let order_id = {
    let mut tx = store.begin().await.unwrap();
    tx.insert_order(&header).await.unwrap()
  };

  assert!(store.fetch_order(order_id).await.unwrap().is_none());
}
