//! Self-service profile use cases: update profile, deactivate account.

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, identity_id::IdentityId,
};
use crate::error::{AuthError, AuthResult, UnauthorizedReason};

const PHOTO_MAX_LENGTH: usize = 2048;

/// Partial profile update. Password and role are not part of it.
#[derive(Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

pub struct ProfileUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn update(&self, id: &IdentityId, input: UpdateProfileInput) -> AuthResult<Identity> {
        let mut identity = self.load_active(id).await?;

        let name = input.name.as_deref().map(DisplayName::new).transpose()?;
        let email = input.email.map(Email::new).transpose()?;
        let photo = input.photo.map(|photo| validate_photo(&photo)).transpose()?;

        if let Some(email) = &email {
            if let Some(owner) = self.repo.find_by_email(email).await? {
                if owner.id != identity.id {
                    return Err(AuthError::EmailTaken);
                }
            }
        }

        identity.update_profile(name, email, photo);
        self.repo.save(&mut identity).await?;

        tracing::info!(identity_id = %identity.id, "Profile updated");

        Ok(identity)
    }

    /// Soft delete: the row stays, sign-in and tokens stop working
    pub async fn deactivate(&self, id: &IdentityId) -> AuthResult<()> {
        let mut identity = self.load_active(id).await?;
        identity.deactivate();
        self.repo.save(&mut identity).await?;

        tracing::info!(identity_id = %identity.id, "Identity deactivated");

        Ok(())
    }

    async fn load_active(&self, id: &IdentityId) -> AuthResult<Identity> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|identity| identity.active)
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::IdentityGone))
    }
}

fn validate_photo(photo: &str) -> AuthResult<String> {
    let photo = photo.trim();
    if photo.is_empty() || photo.len() > PHOTO_MAX_LENGTH || photo.chars().any(char::is_whitespace)
    {
        return Err(AuthError::validation("Photo must be a URL"));
    }
    Ok(photo.to_string())
}
