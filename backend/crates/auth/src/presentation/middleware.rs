//! Auth Middleware
//!
//! `require_auth` authenticates the request and attaches `CurrentIdentity`.
//! `restrict_to` runs after it and checks the role against a static slice.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::{CurrentIdentity, Gatekeeper, authorize};
use crate::domain::repository::IdentityRepository;
use crate::domain::reset_sender::ResetTokenSender;
use crate::domain::value_object::role::Role;
use crate::error::{AuthError, UnauthorizedReason};
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid bearer token
pub async fn require_auth<R, S>(
    State(state): State<AuthAppState<R, S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let gatekeeper = Gatekeeper::new(state.repo.clone(), state.tokens.clone());
    let current = gatekeeper.authenticate(req.headers()).await?;

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

/// Middleware that admits only the given roles. Must be layered inside `require_auth`.
pub async fn restrict_to(
    State(allowed): State<&'static [Role]>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let current = req
        .extensions()
        .get::<CurrentIdentity>()
        .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingCredential))?;

    if !authorize(current.identity(), allowed) {
        tracing::warn!(
            identity_id = %current.identity().id,
            role = %current.identity().role,
            "Role not permitted"
        );
        return Err(AuthError::Unauthorized(UnauthorizedReason::InsufficientRole));
    }

    Ok(next.run(req).await)
}

impl<St> FromRequestParts<St> for CurrentIdentity
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentIdentity>()
            .cloned()
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingCredential))
    }
}
