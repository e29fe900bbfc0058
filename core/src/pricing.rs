// src/pricing.rs

//! Cart pricing. Line totals are always computed here, never taken from the client.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;
use crate::model::{CartItem, NewLineItem, NewOrder};

fn to_cents(amount: Decimal) -> Decimal {
  let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  cents.rescale(2);
  cents
}

/// Unit price charged for a cart entry: the discount price for deals, the list price otherwise.
///
/// Rounded to cents (halves away from zero), the precision the unit price is stored at, so the
/// stored line total is always the stored unit price times the quantity.
pub fn effective_unit_price(index: usize, item: &CartItem) -> Result<Decimal, ValidationError> {
  let price = if item.is_deal {
    item.discount_price.ok_or_else(|| ValidationError::MissingDealPrice {
      index,
      name: item.name.clone(),
    })?
  } else {
    item.price
  };

  if price < Decimal::ZERO {
    return Err(ValidationError::NegativePrice {
      index,
      name: item.name.clone(),
      price,
    });
  }
  Ok(to_cents(price))
}

/// `unit_price * quantity`, rounded to cents with halves away from zero. Always carries
/// exactly two decimal places (`50` becomes `50.00`). `None` when the product does not fit
/// in a `Decimal`.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
  unit_price.checked_mul(Decimal::from(quantity)).map(to_cents)
}

/// Prices one cart entry into the row that will be written for it.
pub fn price_item(index: usize, item: &CartItem) -> Result<NewLineItem, ValidationError> {
  if item.quantity < 1 {
    return Err(ValidationError::NonPositiveQuantity {
      index,
      name: item.name.clone(),
      quantity: item.quantity,
    });
  }
  let unit_price = effective_unit_price(index, item)?;
  let total_price = line_total(unit_price, item.quantity).ok_or_else(|| ValidationError::AmountOverflow {
    index,
    name: item.name.clone(),
  })?;

  Ok(NewLineItem {
    product_id: item.id.to_string(),
    product_name: item.name.clone(),
    quantity: item.quantity,
    price_per_unit: unit_price,
    total_price,
  })
}

/// Prices the whole cart, preserving cart order.
pub fn price_cart(items: &[CartItem]) -> Result<Vec<NewLineItem>, ValidationError> {
  items.iter().enumerate().map(|(index, item)| price_item(index, item)).collect()
}

/// Checks the caller's subtotal and total against the priced lines.
///
/// Returns the first mismatch found; the caller decides whether that is fatal.
/// `TotalsOverflow` is returned when the sums themselves cannot be computed.
pub fn reconcile_totals(header: &NewOrder, lines: &[NewLineItem]) -> Result<(), ValidationError> {
  let computed_subtotal = lines
    .iter()
    .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.total_price))
    .ok_or(ValidationError::TotalsOverflow)?;
  if computed_subtotal != header.subtotal {
    return Err(ValidationError::SubtotalMismatch {
      supplied: header.subtotal,
      computed: computed_subtotal,
    });
  }

  let computed_total = header
    .subtotal
    .checked_add(header.delivery_fee)
    .ok_or(ValidationError::TotalsOverflow)?;
  if computed_total != header.total_amount {
    return Err(ValidationError::TotalMismatch {
      supplied: header.total_amount,
      computed: computed_total,
    });
  }
  Ok(())
}
