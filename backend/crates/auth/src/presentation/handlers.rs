//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentIdentity, ForgotPasswordUseCase, ManageIdentitiesUseCase, ProfileUseCase,
    ResetPasswordInput, ResetPasswordUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, TokenService, UpdatePasswordInput, UpdatePasswordUseCase, UpdateProfileInput,
};
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::reset_sender::ResetTokenSender;
use crate::domain::value_object::{identity_id::IdentityId, role::Role};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    Envelope, ForgotPasswordRequest, IdentityData, IdentityListData, IdentityResponse,
    MessageResponse, ResetPasswordRequest, SessionData, SignInRequest, SignUpRequest,
    UpdateMeRequest, UpdatePasswordRequest, UpdateRoleRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, S>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub sender: Arc<S>,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
}

impl<R, S> AuthAppState<R, S>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, sender: S, config: AuthConfig) -> Self {
        let tokens = TokenService::new(&config);
        Self {
            repo: Arc::new(repo),
            sender: Arc::new(sender),
            config: Arc::new(config),
            tokens,
        }
    }
}

/// Issue a session token for `identity`, return it in the body and set the `jwt` cookie
pub fn issue_and_respond(
    config: &AuthConfig,
    tokens: &TokenService,
    identity: &Identity,
    status: StatusCode,
) -> AuthResult<Response> {
    let token = tokens.issue(&identity.id)?;
    let cookie = config
        .token_cookie()
        .set_header(&token)
        .map_err(|e| AuthError::Internal(format!("Session cookie header: {e}")))?;

    let body = Envelope::success(SessionData {
        token,
        identity: IdentityResponse::from(identity),
    });

    Ok((status, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

fn identity_envelope(identity: &Identity) -> Json<Envelope<IdentityData>> {
    Json(Envelope::success(IdentityData {
        identity: IdentityResponse::from(identity),
    }))
}

fn parse_id(raw: &str) -> AuthResult<IdentityId> {
    raw.parse()
        .map_err(|_| AuthError::validation(format!("Invalid id: {raw}")))
}

// ============================================================================
// Public: Sign Up / Sign In / Sign Out
// ============================================================================

/// POST /api/v1/users/signup
pub async fn sign_up<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let identity = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
        })
        .await?;

    issue_and_respond(&state.config, &state.tokens, &identity, StatusCode::CREATED)
}

/// POST /api/v1/users/login
pub async fn sign_in<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let identity = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    issue_and_respond(&state.config, &state.tokens, &identity, StatusCode::OK)
}

/// POST /api/v1/users/logout
pub async fn sign_out<R, S>(State(state): State<AuthAppState<R, S>>) -> AuthResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let cookie = state
        .config
        .token_cookie()
        .clear_header()
        .map_err(|e| AuthError::Internal(format!("Session cookie header: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::success("Logged out")),
    )
        .into_response())
}

// ============================================================================
// Public: Password Reset
// ============================================================================

/// POST /api/v1/users/forgot-password
pub async fn forgot_password<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let use_case = ForgotPasswordUseCase::new(
        state.repo.clone(),
        state.sender.clone(),
        state.config.clone(),
    );

    use_case.execute(req.email).await?;

    Ok(Json(MessageResponse::success("Token sent to email!")))
}

/// PATCH /api/v1/users/reset-password/{token}
pub async fn reset_password<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.repo.clone(), state.config.clone());

    let identity = use_case
        .execute(ResetPasswordInput {
            token,
            password: req.password,
            password_confirm: req.password_confirm,
        })
        .await?;

    issue_and_respond(&state.config, &state.tokens, &identity, StatusCode::OK)
}

// ============================================================================
// Authenticated: Own Account
// ============================================================================

/// PATCH /api/v1/users/update-my-password
pub async fn update_my_password<R, S>(
    State(state): State<AuthAppState<R, S>>,
    current: CurrentIdentity,
    Json(req): Json<UpdatePasswordRequest>,
) -> AuthResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let use_case = UpdatePasswordUseCase::new(state.repo.clone(), state.config.clone());

    let identity = use_case
        .execute(
            &current.identity().id,
            UpdatePasswordInput {
                password_current: req.password_current,
                password: req.password,
                password_confirm: req.password_confirm,
            },
        )
        .await?;

    issue_and_respond(&state.config, &state.tokens, &identity, StatusCode::OK)
}

/// GET /api/v1/users/me
pub async fn get_me(current: CurrentIdentity) -> Json<Envelope<IdentityData>> {
    identity_envelope(current.identity())
}

/// PATCH /api/v1/users/update-me
pub async fn update_me<R, S>(
    State(state): State<AuthAppState<R, S>>,
    current: CurrentIdentity,
    Json(req): Json<UpdateMeRequest>,
) -> AuthResult<Json<Envelope<IdentityData>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    if req.touches_password() {
        return Err(AuthError::validation(
            "This route is not for password updates. Please use /update-my-password",
        ));
    }

    let use_case = ProfileUseCase::new(state.repo.clone());
    let identity = use_case
        .update(
            &current.identity().id,
            UpdateProfileInput {
                name: req.name,
                email: req.email,
                photo: req.photo,
            },
        )
        .await?;

    Ok(identity_envelope(&identity))
}

/// DELETE /api/v1/users/delete-me
pub async fn delete_me<R, S>(
    State(state): State<AuthAppState<R, S>>,
    current: CurrentIdentity,
) -> AuthResult<StatusCode>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    ProfileUseCase::new(state.repo.clone())
        .deactivate(&current.identity().id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/v1/users
pub async fn list_identities<R, S>(
    State(state): State<AuthAppState<R, S>>,
) -> AuthResult<Json<Envelope<IdentityListData>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let identities = ManageIdentitiesUseCase::new(state.repo.clone()).list().await?;
    let identities: Vec<IdentityResponse> = identities.iter().map(IdentityResponse::from).collect();

    Ok(Json(Envelope::success(IdentityListData {
        results: identities.len(),
        identities,
    })))
}

/// GET /api/v1/users/{id}
pub async fn get_identity<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Path(id): Path<String>,
) -> AuthResult<Json<Envelope<IdentityData>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let identity = ManageIdentitiesUseCase::new(state.repo.clone()).get(&id).await?;
    Ok(identity_envelope(&identity))
}

/// PATCH /api/v1/users/{id}/role
pub async fn update_role<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> AuthResult<Json<Envelope<IdentityData>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let role = Role::from_code(&req.role)?;
    let identity = ManageIdentitiesUseCase::new(state.repo.clone())
        .set_role(&id, role)
        .await?;
    Ok(identity_envelope(&identity))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_identity<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    S: ResetTokenSender + Clone + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    ManageIdentitiesUseCase::new(state.repo.clone())
        .delete(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
