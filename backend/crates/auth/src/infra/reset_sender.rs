//! Reset link delivery channels

use crate::domain::reset_sender::ResetTokenSender;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

const REDACTED: &str = "[redacted]";

/// Records reset requests in the tracing log. There is no mail transport.
///
/// The link is a live credential, so it is redacted unless `log_links` is on.
#[derive(Debug, Clone, Default)]
pub struct LogResetTokenSender {
    log_links: bool,
}

impl LogResetTokenSender {
    pub fn new(log_links: bool) -> Self {
        Self { log_links }
    }

    fn shown_url<'a>(&self, reset_url: &'a str) -> &'a str {
        if self.log_links { reset_url } else { REDACTED }
    }
}

impl ResetTokenSender for LogResetTokenSender {
    async fn send_reset(&self, email: &Email, reset_url: &str) -> AuthResult<()> {
        tracing::info!(
            to = %email,
            reset_url = %self.shown_url(reset_url),
            "Password reset link issued"
        );
        Ok(())
    }
}

/// Records every delivery for assertions
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct CapturingResetTokenSender {
    sent: std::sync::Arc<tokio::sync::Mutex<Vec<(String, String)>>>,
}

#[cfg(test)]
impl CapturingResetTokenSender {
    /// Most recent `(email, reset_url)`
    pub async fn last(&self) -> Option<(String, String)> {
        self.sent.lock().await.last().cloned()
    }
}

#[cfg(test)]
impl ResetTokenSender for CapturingResetTokenSender {
    async fn send_reset(&self, email: &Email, reset_url: &str) -> AuthResult<()> {
        self.sent
            .lock()
            .await
            .push((email.to_string(), reset_url.to_string()));
        Ok(())
    }
}
