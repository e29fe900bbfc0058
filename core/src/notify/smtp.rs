// src/notify/smtp.rs

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::error::NotifyError;
use crate::notify::{OwnerNotification, OwnerNotifier};

/// SMTP account used to email the shop owner.
#[derive(Clone)]
pub struct SmtpSettings {
  pub host: String,
  /// Login name; also used as the From address.
  pub username: String,
  pub password: String,
  pub owner_address: String,
}

impl std::fmt::Debug for SmtpSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SmtpSettings")
      .field("host", &self.host)
      .field("username", &self.username)
      .field("password", &"[REDACTED]")
      .field("owner_address", &self.owner_address)
      .finish()
  }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
  address.parse::<Mailbox>().map_err(|source| NotifyError::Address {
    address: address.to_string(),
    source,
  })
}

/// Sends owner notifications through an authenticated SMTP relay (STARTTLS/TLS per lettre's relay defaults).
pub struct SmtpNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
  to: Mailbox,
}

impl SmtpNotifier {
  pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
    let from = parse_mailbox(&settings.username)?;
    let to = parse_mailbox(&settings.owner_address)?;
    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
      .credentials(Credentials::new(settings.username.clone(), settings.password.clone()))
      .build();

    info!(smtp_host = %settings.host, owner = %to, "SMTP notifier configured.");
    Ok(Self { transport, from, to })
  }

  fn build_message(&self, notification: &OwnerNotification) -> Result<Message, NotifyError> {
    let message = Message::builder()
      .from(self.from.clone())
      .to(self.to.clone())
      .subject(notification.subject.clone())
      .header(ContentType::TEXT_HTML)
      .body(notification.html.clone())?;
    Ok(message)
  }
}

#[async_trait]
impl OwnerNotifier for SmtpNotifier {
  #[instrument(name = "notify::smtp_send", skip(self, notification), fields(order_id = %notification.order_id), err)]
  async fn send(&self, notification: &OwnerNotification) -> Result<(), NotifyError> {
    let message = self.build_message(notification)?;
    let response = self.transport.send(message).await?;
    info!(
      code = %response.code(),
      "SMTP relay accepted owner notification."
    );
    Ok(())
  }
}
