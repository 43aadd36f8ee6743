//! In-Memory Repository Implementation
//!
//! Used by tests and by local runs without a database. Email uniqueness and
//! the row-version check are enforced under the write lock, mirroring the
//! unique index and the conditional `UPDATE` in Postgres.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{email::Email, identity_id::IdentityId};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_in_use(identities: &HashMap<Uuid, Identity>, email: &Email, except: &IdentityId) -> bool {
    identities
        .values()
        .any(|other| other.email == *email && other.id != *except)
}

impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut identities = self.identities.write().await;

        if email_in_use(&identities, &identity.email, &identity.id) {
            return Err(AuthError::EmailTaken);
        }
        if identities.contains_key(identity.id.as_uuid()) {
            return Err(AuthError::Internal(format!(
                "duplicate identity id {}",
                identity.id
            )));
        }

        identities.insert(identity.id.into_uuid(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &IdentityId) -> AuthResult<Option<Identity>> {
        Ok(self.identities.read().await.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.email == *email)
            .cloned())
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<Identity>> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| {
                identity.reset_ticket.as_ref().is_some_and(|ticket| {
                    platform::crypto::constant_time_eq(
                        ticket.token_hash.as_bytes(),
                        token_hash.as_bytes(),
                    )
                })
            })
            .cloned())
    }

    async fn save(&self, identity: &mut Identity) -> AuthResult<()> {
        let mut identities = self.identities.write().await;

        let stored_version = identities
            .get(identity.id.as_uuid())
            .map(|stored| stored.version)
            .ok_or_else(|| AuthError::not_found("No user found with that ID"))?;
        if stored_version != identity.version {
            return Err(AuthError::StaleWrite);
        }
        if email_in_use(&identities, &identity.email, &identity.id) {
            return Err(AuthError::EmailTaken);
        }

        identity.version += 1;
        identities.insert(identity.id.into_uuid(), identity.clone());
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> AuthResult<bool> {
        Ok(self.identities.write().await.remove(id.as_uuid()).is_some())
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        let mut all: Vec<Identity> = self.identities.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(all)
    }
}

/// Yields to the scheduler after every read, so two use cases joined on one
/// task both read before either writes
#[cfg(test)]
#[derive(Clone)]
pub struct InterleavingRepository {
    inner: InMemoryIdentityRepository,
}

#[cfg(test)]
impl InterleavingRepository {
    pub fn new(inner: InMemoryIdentityRepository) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
impl IdentityRepository for InterleavingRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        self.inner.create(identity).await
    }

    async fn find_by_id(&self, id: &IdentityId) -> AuthResult<Option<Identity>> {
        let found = self.inner.find_by_id(id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let found = self.inner.find_by_email(email).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<Identity>> {
        let found = self.inner.find_by_reset_token_hash(token_hash).await;
        tokio::task::yield_now().await;
        found
    }

    async fn save(&self, identity: &mut Identity) -> AuthResult<()> {
        self.inner.save(identity).await
    }

    async fn delete(&self, id: &IdentityId) -> AuthResult<bool> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        self.inner.list().await
    }
}
