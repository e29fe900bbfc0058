// src/error.rs
use rust_decimal::Decimal;
use thiserror::Error;

/// A submission that cannot be turned into rows. Raised before anything is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Customer field '{field}' is required")]
  MissingCustomerField { field: &'static str },

  #[error("Cart item {index} ('{name}') has non-positive quantity {quantity}")]
  NonPositiveQuantity { index: usize, name: String, quantity: i32 },

  #[error("Cart item {index} ('{name}') is flagged as a deal but has no discount price")]
  MissingDealPrice { index: usize, name: String },

  #[error("Cart item {index} ('{name}') has negative price {price}")]
  NegativePrice { index: usize, name: String, price: Decimal },

  #[error("Cart item {index} ('{name}') amount is too large to price")]
  AmountOverflow { index: usize, name: String },

  #[error("Order totals are too large to add up")]
  TotalsOverflow,

  #[error("Subtotal {supplied} does not match the sum of line totals {computed}")]
  SubtotalMismatch { supplied: Decimal, computed: Decimal },

  #[error("Total {supplied} does not match subtotal plus delivery fee {computed}")]
  TotalMismatch { supplied: Decimal, computed: Decimal },
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Transaction already finished")]
  TransactionFinished,

  #[error("Store unavailable: {0}")]
  Unavailable(String),

  #[error("Constraint violation: {0}")]
  Constraint(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("Invalid mailbox '{address}': {source}")]
  Address {
    address: String,
    #[source]
    source: lettre::address::AddressError,
  },

  #[error("Failed to build email message: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("SMTP transport error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),

  #[error("Failed to render notification template: {0}")]
  Template(#[from] tera::Error),

  #[error("Notification transport rejected the message: {0}")]
  Rejected(String),
}

/// Everything that makes a submission fail. Both variants end in a rollback.
#[derive(Debug, Error)]
pub enum IntakeError {
  #[error("Invalid order: {0}")]
  Validation(#[from] ValidationError),

  #[error("Order store failure: {0}")]
  Store(#[from] StoreError),
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
pub type IntakeResult<T, E = IntakeError> = std::result::Result<T, E>;
