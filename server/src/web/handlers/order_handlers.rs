// bakery_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use bakery_core::OrderRequest;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(
    name = "handler::create_order",
    skip(app_state, req_payload),
    fields(
      customer = %req_payload.customer_details.name,
      items = req_payload.cart_items.len()
    )
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
  info!("Order submission received.");

  // The intake commits first and queues the owner email afterwards; the response
  // never waits on that email.
  match app_state.intake.submit(&req_payload).await {
    Ok(receipt) => {
      info!(order_id = %receipt.order_id, "Order created.");
      Ok(HttpResponse::Created().json(json!({
        "success": true,
        "orderId": receipt.order_id,
        "message": "Order created successfully",
      })))
    }
    Err(intake_err) => {
      warn!("Order submission failed: {:?}", intake_err);
      Err(AppError::Intake(intake_err))
    }
  }
}
