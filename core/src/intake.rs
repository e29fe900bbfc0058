// src/intake.rs

//! The order submission transaction.
//!
//! `OrderIntake::submit` validates and prices the cart, writes the header and every line
//! item inside one store transaction, commits, and only then queues the owner email.
//! Any failure before the commit completes rolls the whole submission back.

use std::sync::Arc;
use tracing::{debug, error, field, info, instrument, warn, Span};

use crate::error::{IntakeResult, NotifyError, StoreError, StoreResult, ValidationError};
use crate::model::{NewLineItem, NewOrder, OrderId, OrderRequest};
use crate::notify::{NotificationComposer, NotificationDispatcher};
use crate::pricing;
use crate::store::{OrderStore, OrderTransaction};

#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeOptions {
  /// Reject submissions whose subtotal/total do not add up instead of only warning.
  pub strict_totals: bool,
}

/// What the caller gets back for a committed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReceipt {
  pub order_id: OrderId,
}

pub struct OrderIntake {
  store: Arc<dyn OrderStore>,
  composer: NotificationComposer,
  dispatcher: NotificationDispatcher,
  options: IntakeOptions,
}

impl OrderIntake {
  pub fn new(
    store: Arc<dyn OrderStore>,
    dispatcher: NotificationDispatcher,
    options: IntakeOptions,
  ) -> Result<Self, NotifyError> {
    Ok(Self {
      store,
      composer: NotificationComposer::new()?,
      dispatcher,
      options,
    })
  }

  #[instrument(
    name = "intake::submit",
    skip_all,
    fields(items = request.cart_items.len(), order_id = field::Empty)
  )]
  pub async fn submit(&self, request: &OrderRequest) -> IntakeResult<OrderReceipt> {
    let header = NewOrder::from_request(request)?;
    let lines = pricing::price_cart(&request.cart_items)?;
    self.check_totals(&header, &lines)?;

    let mut tx = self.store.begin().await?;
    let order_id = match write_order(&mut tx, &header, &lines).await {
      Ok(order_id) => order_id,
      Err(store_err) => {
        warn!(error = %store_err, "Order transaction failed; rolling back.");
        match tx.rollback().await {
          Ok(()) | Err(StoreError::TransactionFinished) => {}
          Err(rollback_err) => error!(error = %rollback_err, "Rollback failed; the session is discarded."),
        }
        return Err(store_err.into());
      }
    };

    Span::current().record("order_id", order_id.0);
    info!(
      customer = %header.customer_name,
      total = %header.total_amount,
      "Order committed."
    );

    self.notify_owner(order_id, &header, &lines);
    Ok(OrderReceipt { order_id })
  }

  fn check_totals(&self, header: &NewOrder, lines: &[NewLineItem]) -> Result<(), ValidationError> {
    match pricing::reconcile_totals(header, lines) {
      Ok(()) => Ok(()),
      Err(overflow @ ValidationError::TotalsOverflow) => Err(overflow),
      Err(mismatch) if self.options.strict_totals => Err(mismatch),
      Err(mismatch) => {
        warn!(%mismatch, "Accepting caller-supplied totals that do not reconcile with the cart.");
        Ok(())
      }
    }
  }

  fn notify_owner(&self, order_id: OrderId, header: &NewOrder, lines: &[NewLineItem]) {
    match self.composer.compose(order_id, header, lines) {
      Ok(notification) => {
        debug!(%order_id, "Queueing owner notification.");
        self.dispatcher.dispatch(notification);
      }
      Err(e) => error!(%order_id, error = %e, "Could not compose owner notification; skipping it."),
    }
  }
}

async fn write_order(
  tx: &mut Box<dyn OrderTransaction>,
  header: &NewOrder,
  lines: &[NewLineItem],
) -> StoreResult<OrderId> {
  let order_id = tx.insert_order(header).await?;
  for line in lines {
    tx.insert_line_item(order_id, line).await?;
  }
  tx.commit().await?;
  Ok(order_id)
}
