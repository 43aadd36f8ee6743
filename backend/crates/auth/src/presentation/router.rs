//! Auth Router
//!
//! Mount under `/api/v1/users`.

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityRepository;
use crate::domain::reset_sender::ResetTokenSender;
use crate::domain::value_object::role::Role;
use crate::infra::{postgres::PgIdentityRepository, reset_sender::LogResetTokenSender};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_auth, restrict_to};

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgIdentityRepository, config: AuthConfig) -> Router {
    let sender = LogResetTokenSender::new(config.log_reset_links);
    auth_router_generic(repo, sender, config)
}

/// Create a generic Auth router for any repository and delivery channel
pub fn auth_router_generic<R, S>(repo: R, sender: S, config: AuthConfig) -> Router
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, sender, config);

    let public = Router::new()
        .route("/signup", post(handlers::sign_up::<R, S>))
        .route("/login", post(handlers::sign_in::<R, S>))
        .route("/logout", post(handlers::sign_out::<R, S>))
        .route("/forgot-password", post(handlers::forgot_password::<R, S>))
        .route(
            "/reset-password/{token}",
            patch(handlers::reset_password::<R, S>),
        );

    let own_account = Router::new()
        .route(
            "/update-my-password",
            patch(handlers::update_my_password::<R, S>),
        )
        .route("/me", get(handlers::get_me))
        .route("/update-me", patch(handlers::update_me::<R, S>))
        .route("/delete-me", delete(handlers::delete_me::<R, S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R, S>,
        ));

    // Layers run last-added first: authenticate, then check the role
    let admin = Router::new()
        .route("/", get(handlers::list_identities::<R, S>))
        .route(
            "/{id}",
            get(handlers::get_identity::<R, S>).delete(handlers::delete_identity::<R, S>),
        )
        .route("/{id}/role", patch(handlers::update_role::<R, S>))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, restrict_to))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R, S>,
        ));

    Router::new()
        .merge(public)
        .merge(own_account)
        .merge(admin)
        .with_state(state)
}
