//! Forgot Password Use Case
//!
//! Attaches a fresh reset ticket to the identity and delivers the reset
//! link. If delivery fails the ticket is withdrawn again.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::reset_ticket::ResetTicket;
use crate::domain::repository::IdentityRepository;
use crate::domain::reset_sender::ResetTokenSender;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct ForgotPasswordUseCase<R, S>
where
    R: IdentityRepository,
    S: ResetTokenSender,
{
    repo: Arc<R>,
    sender: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<R, S> ForgotPasswordUseCase<R, S>
where
    R: IdentityRepository,
    S: ResetTokenSender,
{
    pub fn new(repo: Arc<R>, sender: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            sender,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<()> {
        self.execute_at(email, Utc::now()).await
    }

    pub async fn execute_at(&self, email: String, now: DateTime<Utc>) -> AuthResult<()> {
        let not_found = || AuthError::not_found("There is no user with that email address");

        let email = Email::new(email).map_err(|_| not_found())?;
        let mut identity = match self.repo.find_by_email(&email).await? {
            Some(identity) if identity.active => identity,
            _ => return Err(not_found()),
        };

        let (plain, ticket) = ResetTicket::generate(now, self.config.reset_ttl);
        let expires_at = ticket.expires_at;
        identity.set_reset_ticket(ticket);
        self.repo.save(&mut identity).await?;

        let reset_url = self.config.reset_url(plain.as_str());
        if let Err(e) = self.sender.send_reset(&identity.email, &reset_url).await {
            tracing::error!(identity_id = %identity.id, error = %e, "Reset delivery failed");
            identity.clear_reset_ticket();
            self.repo.save(&mut identity).await?;
            return Err(AuthError::Internal(
                "There was an error sending the email. Try again later".into(),
            ));
        }

        tracing::info!(
            identity_id = %identity.id,
            expires_at = %expires_at,
            "Reset ticket issued"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::domain::entity::identity::Identity;
    use crate::infra::memory::InMemoryIdentityRepository;
    use crate::infra::reset_sender::CapturingResetTokenSender;

    struct FailingSender;

    impl ResetTokenSender for FailingSender {
        async fn send_reset(&self, _email: &Email, _reset_url: &str) -> AuthResult<()> {
            Err(AuthError::Internal("smtp down".into()))
        }
    }

    async fn signed_up(repo: &Arc<InMemoryIdentityRepository>, config: &Arc<AuthConfig>) -> Identity {
        SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                name: "Mira".into(),
                email: "mira@example.com".into(),
                password: "canyon-walk-31".into(),
                password_confirm: "canyon-walk-31".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ticket_is_stored_hashed_and_link_delivered() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let config = Arc::new(AuthConfig::for_testing("secret"));
        let sender = Arc::new(CapturingResetTokenSender::default());
        let identity = signed_up(&repo, &config).await;

        ForgotPasswordUseCase::new(repo.clone(), sender.clone(), config)
            .execute("mira@example.com".into())
            .await
            .unwrap();

        let (to, url) = sender.last().await.unwrap();
        assert_eq!(to, "mira@example.com");
        let plain = url.rsplit('/').next().unwrap().to_string();

        let stored = repo.find_by_id(&identity.id).await.unwrap().unwrap();
        let ticket = stored.reset_ticket.unwrap();
        assert_ne!(ticket.token_hash, plain);
        assert_eq!(ResetTicket::hash_presented(&plain).unwrap(), ticket.token_hash);
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let config = Arc::new(AuthConfig::for_testing("secret"));
        let sender = Arc::new(CapturingResetTokenSender::default());

        let err = ForgotPasswordUseCase::new(repo, sender.clone(), config)
            .execute("ghost@example.com".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
        assert!(sender.last().await.is_none());
    }

    #[tokio::test]
    async fn test_delivery_failure_withdraws_ticket() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let config = Arc::new(AuthConfig::for_testing("secret"));
        let identity = signed_up(&repo, &config).await;

        let err = ForgotPasswordUseCase::new(repo.clone(), Arc::new(FailingSender), config)
            .execute("mira@example.com".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));

        let stored = repo.find_by_id(&identity.id).await.unwrap().unwrap();
        assert!(stored.reset_ticket.is_none());
    }
}
