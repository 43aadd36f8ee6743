//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::Identity;

const SUCCESS: &str = "success";

// ============================================================================
// Requests
// ============================================================================

/// Sign up request. A `role` field, if sent, is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePasswordRequest {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update. Password fields are accepted only to be rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl UpdateMeRequest {
    pub fn touches_password(&self) -> bool {
        self.password.is_some() || self.password_confirm.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of an identity. Never carries the hash or reset ticket.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: String,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            name: identity.name.to_string(),
            email: identity.email.to_string(),
            photo: identity.photo.clone(),
            role: identity.role.code().to_string(),
        }
    }
}

/// `{ "status": "success", "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: SUCCESS,
            data,
        }
    }
}

/// Payload of every credential-issuing response
#[derive(Debug, Clone, Serialize)]
pub struct SessionData {
    pub token: String,
    pub identity: IdentityResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityData {
    pub identity: IdentityResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityListData {
    pub results: usize,
    pub identities: Vec<IdentityResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
        }
    }
}
