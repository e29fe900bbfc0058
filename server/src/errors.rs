// bakery_server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bakery_core::{IntakeError, NotifyError};
use serde_json::json;
use thiserror::Error;

/// Body sent for every failed submission. Callers get no detail about the cause.
pub const ORDER_FAILURE_MESSAGE: &str = "Failed to create order";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  // Malformed JSON or a body that does not fit the order shape.
  #[error("Invalid Payload: {0}")]
  Payload(String),

  #[error("Order Intake Error: {0}")]
  Intake(#[from] IntakeError),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Notifier Setup Error: {0}")]
  Notify(#[from] NotifyError),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    match self {
      AppError::Payload(detail) => tracing::warn!(detail = %detail, "Rejecting order payload"),
      AppError::Intake(IntakeError::Validation(e)) => tracing::warn!(error = %e, "Rejecting invalid order"),
      other => tracing::error!(application_error = %other, "Order request failed"),
    }
    HttpResponse::build(self.status_code()).json(json!({
      "success": false,
      "error": ORDER_FAILURE_MESSAGE,
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
