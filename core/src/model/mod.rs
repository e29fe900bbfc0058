// src/model/mod.rs

//! Wire types for a submission and the rows it turns into.

pub mod line_item;
pub mod order;
pub mod request;

pub use line_item::{NewLineItem, OrderLineItem};
pub use order::{NewOrder, Order, OrderId, ANONYMOUS_USER};
pub use request::{CartItem, CustomerDetails, OrderRequest, ProductRef};
