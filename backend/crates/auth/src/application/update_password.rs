//! Update Password Use Case
//!
//! Authenticated password change. Tokens issued before the change stop
//! passing the gatekeeper's freshness check.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    identity_id::IdentityId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult, UnauthorizedReason};

pub struct UpdatePasswordInput {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

pub struct UpdatePasswordUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UpdatePasswordUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        id: &IdentityId,
        input: UpdatePasswordInput,
    ) -> AuthResult<Identity> {
        let mut identity = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|identity| identity.active)
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::IdentityGone))?;

        let current = RawPassword::candidate(input.password_current);
        if !identity.password.verify(&current) {
            return Err(AuthError::Unauthorized(
                UnauthorizedReason::InvalidCredentials,
            ));
        }

        if input.password != input.password_confirm {
            return Err(AuthError::validation("Passwords are not the same"));
        }
        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw_password, &self.config.hash_cost)?;

        identity.change_password(password, Utc::now());
        self.repo.save(&mut identity).await?;

        tracing::info!(identity_id = %identity.id, "Password changed");

        Ok(identity)
    }
}
