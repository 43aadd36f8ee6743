//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{email::Email, identity_id::IdentityId};
use crate::error::AuthResult;

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Insert a new identity. Fails with `AuthError::EmailTaken` on a duplicate email.
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Find identity by ID (active or not)
    async fn find_by_id(&self, id: &IdentityId) -> AuthResult<Option<Identity>>;

    /// Find identity by normalised email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Find the identity whose reset ticket hash equals `token_hash`
    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<Identity>>;

    /// Persist every mutable field in one atomic write, provided the stored row
    /// is still at `identity.version`. On success the version is bumped in place.
    ///
    /// Fails with `StaleWrite` if another write landed since the snapshot was
    /// read, `EmailTaken` if the email now collides, `NotFound` if the row is gone.
    async fn save(&self, identity: &mut Identity) -> AuthResult<()>;

    /// Hard delete. Returns `false` if nothing was deleted.
    async fn delete(&self, id: &IdentityId) -> AuthResult<bool>;

    /// All identities, oldest first
    async fn list(&self) -> AuthResult<Vec<Identity>>;
}
