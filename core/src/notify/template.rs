// src/notify/template.rs

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::NotifyError;
use crate::model::{NewLineItem, NewOrder, OrderId};
use crate::notify::OwnerNotification;

// The `.html` suffix turns on tera's autoescaping for every interpolated value.
const TEMPLATE_NAME: &str = "owner_order_notification.html";

const TEMPLATE: &str = r#"<h2>New Order Received! (#{{ order_id }})</h2>
<p><strong>Customer:</strong> {{ customer_name }} ({{ customer_phone }})</p>
<p><strong>Address:</strong> {{ delivery_address }}</p>
<p><strong>Notes:</strong> {{ notes }}</p>
<hr/>
<h3>Items:</h3>
<ul>
{% for item in items %}<li>{{ item.name }} x {{ item.quantity }} - ₹{{ item.total }}</li>
{% endfor %}</ul>
<p><strong>Subtotal:</strong> ₹{{ subtotal }}</p>
<p><strong>Delivery:</strong> ₹{{ delivery_fee }}</p>
<h3><strong>Total:</strong> ₹{{ total }}</h3>
"#;

#[derive(Serialize)]
struct ItemView<'a> {
  name: &'a str,
  quantity: i32,
  total: String,
}

/// Renders the owner email for a committed order.
pub struct NotificationComposer {
  tera: Tera,
}

impl NotificationComposer {
  pub fn new() -> Result<Self, NotifyError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
    Ok(Self { tera })
  }

  pub fn compose(
    &self,
    order_id: OrderId,
    header: &NewOrder,
    lines: &[NewLineItem],
  ) -> Result<OwnerNotification, NotifyError> {
    let items: Vec<ItemView<'_>> = lines
      .iter()
      .map(|line| ItemView {
        name: &line.product_name,
        quantity: line.quantity,
        total: line.total_price.to_string(),
      })
      .collect();

    let notes = header
      .order_notes
      .as_deref()
      .filter(|notes| !notes.is_empty())
      .unwrap_or("N/A");

    let mut context = Context::new();
    context.insert("order_id", &order_id.0);
    context.insert("customer_name", &header.customer_name);
    context.insert("customer_phone", &header.customer_phone);
    context.insert("delivery_address", &header.delivery_address);
    context.insert("notes", notes);
    context.insert("items", &items);
    context.insert("subtotal", &header.subtotal.to_string());
    context.insert("delivery_fee", &header.delivery_fee.to_string());
    context.insert("total", &header.total_amount.to_string());

    let html = self.tera.render(TEMPLATE_NAME, &context)?;

    Ok(OwnerNotification {
      order_id,
      subject: format!("New Order #{} from {}", order_id, header.customer_name),
      html,
    })
  }
}
