//! Sign In Use Case
//!
//! Email + password login. Unknown email, deactivated account and wrong
//! password are indistinguishable to the caller.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult, UnauthorizedReason};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<Identity> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::validation("Please provide email and password"));
        }

        let invalid = || AuthError::Unauthorized(UnauthorizedReason::InvalidCredentials);

        // A malformed email cannot belong to anyone
        let email = Email::new(input.email).map_err(|_| invalid())?;
        let candidate = RawPassword::candidate(input.password);

        let Some(mut identity) = self.repo.find_by_email(&email).await? else {
            return Err(invalid());
        };

        if !identity.active || !identity.password.verify(&candidate) {
            return Err(invalid());
        }

        if identity.password.needs_rehash(&self.config.hash_cost) {
            let upgraded = UserPassword::from_raw(&candidate, &self.config.hash_cost)?;
            identity.upgrade_password_hash(upgraded);
            self.repo.save(&mut identity).await?;
            tracing::info!(identity_id = %identity.id, "Password hash upgraded");
        }

        tracing::info!(identity_id = %identity.id, "Identity signed in");

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::infra::memory::InMemoryIdentityRepository;
    use platform::password::HashCost;

    async fn setup() -> (Arc<InMemoryIdentityRepository>, Arc<AuthConfig>, Identity) {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let config = Arc::new(AuthConfig::for_testing("secret"));
        let identity = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                name: "Aarav Lynn".into(),
                email: "aarav@example.com".into(),
                password: "river-raft-77".into(),
                password_confirm: "river-raft-77".into(),
            })
            .await
            .unwrap();
        (repo, config, identity)
    }

    fn login(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_correct_password_signs_in() {
        let (repo, config, identity) = setup().await;
        let signed_in = SignInUseCase::new(repo, config)
            .execute(login("AARAV@example.com", "river-raft-77"))
            .await
            .unwrap();
        assert_eq!(signed_in.id, identity.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let (repo, config, _) = setup().await;
        let use_case = SignInUseCase::new(repo, config);

        for input in [
            login("aarav@example.com", "river-raft-78"),
            login("nobody@example.com", "river-raft-77"),
            login("not-an-email", "river-raft-77"),
        ] {
            let err = use_case.execute(input).await.unwrap_err();
            assert!(matches!(
                err,
                AuthError::Unauthorized(UnauthorizedReason::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let (repo, config, _) = setup().await;
        let err = SignInUseCase::new(repo, config)
            .execute(login("", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deactivated_identity_cannot_sign_in() {
        let (repo, config, mut identity) = setup().await;
        identity.deactivate();
        repo.save(&mut identity).await.unwrap();

        let err = SignInUseCase::new(repo, config)
            .execute(login("aarav@example.com", "river-raft-77"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_weak_stored_hash_is_upgraded() {
        let (repo, _, identity) = setup().await;
        let stronger = Arc::new(AuthConfig {
            hash_cost: HashCost {
                iterations: HashCost::minimal().iterations + 1,
                ..HashCost::minimal()
            },
            ..AuthConfig::for_testing("secret")
        });

        SignInUseCase::new(repo.clone(), stronger.clone())
            .execute(login("aarav@example.com", "river-raft-77"))
            .await
            .unwrap();

        let stored = repo.find_by_id(&identity.id).await.unwrap().unwrap();
        assert_ne!(stored.password.as_phc_string(), identity.password.as_phc_string());
        assert!(!stored.password.needs_rehash(&stronger.hash_cost));
        assert_eq!(stored.password_changed_at, identity.password_changed_at);
    }
}
