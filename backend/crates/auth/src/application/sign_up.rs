//! Sign Up Use Case
//!
//! Creates a new `user`-role identity.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<Identity> {
        let name = DisplayName::new(&input.name)?;
        let email = Email::new(input.email)?;

        if input.password != input.password_confirm {
            return Err(AuthError::validation("Passwords are not the same"));
        }
        let raw_password = RawPassword::new(input.password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(&raw_password, &self.config.hash_cost)?;
        let identity = Identity::new(name, email, password);

        // Unique index still guards the race between lookup and insert
        self.repo.create(&identity).await?;

        tracing::info!(
            identity_id = %identity.id,
            role = %identity.role,
            "Identity signed up"
        );

        Ok(identity)
    }
}
