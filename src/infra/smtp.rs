use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::domain::email::Email;
use crate::error::{AppError, AppResult};
use crate::services::MailService;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP transport backing the mail seam. Credentials are fixed at startup
/// and shared read-only across concurrent pipeline runs.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, username: String, password: String) -> AppResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|err| {
                AppError::Configuration(format!("invalid SMTP relay '{host}': {err}"))
            })?
            .credentials(Credentials::new(username, password))
            .timeout(Some(SEND_TIMEOUT))
            .build();
        Ok(Self { transport })
    }

    fn mailbox(raw: &str) -> AppResult<Mailbox> {
        raw.parse()
            .map_err(|err| AppError::Delivery(format!("invalid mailbox '{raw}': {err}")))
    }
}

#[async_trait]
impl MailService for SmtpMailer {
    async fn send(&self, email: &Email) -> AppResult<String> {
        let message = Message::builder()
            .from(Self::mailbox(&email.from)?)
            .to(Self::mailbox(&email.to)?)
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|err| AppError::Delivery(format!("failed to build message: {err}")))?;

        debug!(to = %email.to, "handing message to SMTP transport");
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| AppError::Delivery(format!("SMTP send failed: {err}")))?;

        Ok(format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        ))
    }
}
