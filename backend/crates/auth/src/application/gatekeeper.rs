//! Auth Gatekeeper
//!
//! Turns an `Authorization: Bearer <token>` header into the current identity:
//! extract, validate, load, freshness check. Role restriction is the separate
//! pure check [`authorize`].

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};

use crate::application::token::TokenService;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::role::Role;
use crate::error::{AuthError, AuthResult, UnauthorizedReason};

/// The authenticated identity of the current request
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl CurrentIdentity {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Pure role check
pub fn authorize(identity: &Identity, allowed: &[Role]) -> bool {
    identity.role.is_one_of(allowed)
}

/// Token from an exact `Bearer <token>` header value
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, UnauthorizedReason> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(UnauthorizedReason::MissingCredential)?
        .to_str()
        .map_err(|_| UnauthorizedReason::InvalidFormat)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(UnauthorizedReason::MissingCredential),
    }
}

pub struct Gatekeeper<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    tokens: TokenService,
}

impl<R> Gatekeeper<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthResult<CurrentIdentity> {
        self.authenticate_at(headers, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> AuthResult<CurrentIdentity> {
        let token = bearer_token(headers).map_err(AuthError::Unauthorized)?;
        let claims = self.tokens.validate_at(token, now)?;
        let id = claims.identity_id()?;

        let identity = self
            .repo
            .find_by_id(&id)
            .await?
            .filter(|identity| identity.active)
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::IdentityGone))?;

        if identity.changed_password_after(claims.iat) {
            return Err(AuthError::Unauthorized(UnauthorizedReason::StaleCredential));
        }

        tracing::debug!(identity_id = %identity.id, role = %identity.role, "Request authenticated");

        Ok(CurrentIdentity(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};
    use crate::infra::memory::InMemoryIdentityRepository;
    use axum::http::HeaderValue;
    use chrono::Duration;

    struct Fixture {
        repo: Arc<InMemoryIdentityRepository>,
        tokens: TokenService,
        identity: Identity,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let config = Arc::new(AuthConfig::for_testing("gate-secret"));
        let identity = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                name: "Tomas".into(),
                email: "tomas@example.com".into(),
                password: "dune-ride-2024".into(),
                password_confirm: "dune-ride-2024".into(),
            })
            .await
            .unwrap();
        Fixture {
            repo,
            tokens: TokenService::new(&config),
            identity,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn reason(err: AuthError) -> UnauthorizedReason {
        match err {
            AuthError::Unauthorized(reason) => reason,
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_bearer_token_format() {
        assert_eq!(bearer_token(&bearer("abc")), Ok("abc"));

        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(UnauthorizedReason::MissingCredential));

        for bad in ["Bearer", "Bearer ", "bearer abc", "Token abc", "Bearer  abc", "Bearer a b"] {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_static(bad));
            assert!(bearer_token(&headers).is_err(), "{bad} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let f = fixture().await;
        let token = f.tokens.issue(&f.identity.id).unwrap();

        let current = Gatekeeper::new(f.repo, f.tokens)
            .authenticate(&bearer(&token))
            .await
            .unwrap();
        assert_eq!(current.identity().id, f.identity.id);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let f = fixture().await;
        let issued = Utc::now() - Duration::hours(25);
        let token = f.tokens.issue_at(&f.identity.id, issued).unwrap();

        let err = Gatekeeper::new(f.repo, f.tokens)
            .authenticate(&bearer(&token))
            .await
            .unwrap_err();
        assert_eq!(reason(err), UnauthorizedReason::Expired);
    }

    #[tokio::test]
    async fn test_token_before_password_change_is_stale() {
        let f = fixture().await;
        let issued = Utc::now() - Duration::minutes(5);
        let token = f.tokens.issue_at(&f.identity.id, issued).unwrap();

        let mut identity = f.identity.clone();
        let raw = RawPassword::new("new-dune-ride-7".into()).unwrap();
        let password = UserPassword::from_raw(&raw, &platform::password::HashCost::minimal()).unwrap();
        identity.change_password(password, Utc::now());
        f.repo.save(&mut identity).await.unwrap();

        let gatekeeper = Gatekeeper::new(f.repo, f.tokens.clone());
        let err = gatekeeper.authenticate(&bearer(&token)).await.unwrap_err();
        assert_eq!(reason(err), UnauthorizedReason::StaleCredential);

        // A token minted after the change passes
        let fresh = f.tokens.issue(&identity.id).unwrap();
        assert!(gatekeeper.authenticate(&bearer(&fresh)).await.is_ok());
    }

    #[tokio::test]
    async fn test_deleted_or_deactivated_identity_is_gone() {
        let f = fixture().await;
        let token = f.tokens.issue(&f.identity.id).unwrap();
        let gatekeeper = Gatekeeper::new(f.repo.clone(), f.tokens.clone());

        let mut identity = f.identity.clone();
        identity.deactivate();
        f.repo.save(&mut identity).await.unwrap();
        let err = gatekeeper.authenticate(&bearer(&token)).await.unwrap_err();
        assert_eq!(reason(err), UnauthorizedReason::IdentityGone);

        f.repo.delete(&identity.id).await.unwrap();
        let err = gatekeeper.authenticate(&bearer(&token)).await.unwrap_err();
        assert_eq!(reason(err), UnauthorizedReason::IdentityGone);
    }

    #[test]
    fn test_authorize() {
        let raw = RawPassword::new("dune-ride-2024".into()).unwrap();
        let mut identity = Identity::new(
            crate::domain::value_object::display_name::DisplayName::new("A").unwrap(),
            crate::domain::value_object::email::Email::new("a@example.com").unwrap(),
            UserPassword::from_raw(&raw, &platform::password::HashCost::minimal()).unwrap(),
        );
        assert!(!authorize(&identity, &[Role::Admin]));
        identity.set_role(Role::LeadGuide);
        assert!(authorize(&identity, &[Role::Admin, Role::LeadGuide]));
    }
}
