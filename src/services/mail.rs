use async_trait::async_trait;

use crate::domain::email::Email;
use crate::error::AppResult;

/// Authenticated mail transport seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailService: Send + Sync {
    /// Sends one message and returns the transport's delivery response line.
    async fn send(&self, email: &Email) -> AppResult<String>;
}
