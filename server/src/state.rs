// bakery_server/src/state.rs
use bakery_core::OrderIntake;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub intake: Arc<OrderIntake>,
}
