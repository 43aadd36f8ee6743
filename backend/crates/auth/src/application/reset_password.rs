//! Reset Password Use Case
//!
//! Consumes a reset ticket. The ticket is cleared whether it is consumed or
//! found expired.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::{identity::Identity, reset_ticket::ResetTicket};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    /// Plain hex secret from the reset link
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

pub struct ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<Identity> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: ResetPasswordInput,
        now: DateTime<Utc>,
    ) -> AuthResult<Identity> {
        let invalid = || AuthError::not_found("Token is invalid or has expired");

        let token_hash = ResetTicket::hash_presented(&input.token).ok_or_else(invalid)?;
        let mut identity = self
            .repo
            .find_by_reset_token_hash(&token_hash)
            .await?
            .ok_or_else(invalid)?;

        let expired = identity
            .reset_ticket
            .as_ref()
            .is_none_or(|ticket| ticket.is_expired_at(now));
        if expired || !identity.active {
            identity.clear_reset_ticket();
            match self.repo.save(&mut identity).await {
                // Someone else already rewrote the row; the ticket is not ours to clear
                Ok(()) | Err(AuthError::StaleWrite) => {}
                Err(e) => return Err(e),
            }
            tracing::info!(identity_id = %identity.id, "Expired reset ticket discarded");
            return Err(invalid());
        }

        if input.password != input.password_confirm {
            return Err(AuthError::validation("Passwords are not the same"));
        }
        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw_password, &self.config.hash_cost)?;

        // New credential, changed-at and cleared ticket land in one write. A
        // concurrent reset with the same ticket loses on the version check.
        identity.change_password(password, now);
        self.repo.save(&mut identity).await?;

        tracing::info!(identity_id = %identity.id, "Password reset");

        Ok(identity)
    }
}
