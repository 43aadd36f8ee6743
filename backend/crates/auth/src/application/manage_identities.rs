//! Admin use cases over all identities.

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{identity_id::IdentityId, role::Role};
use crate::error::{AuthError, AuthResult};

pub struct ManageIdentitiesUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ManageIdentitiesUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> AuthResult<Vec<Identity>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &IdentityId) -> AuthResult<Identity> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::not_found("No user found with that ID"))
    }

    pub async fn set_role(&self, id: &IdentityId, role: Role) -> AuthResult<Identity> {
        let mut identity = self.get(id).await?;
        let previous = identity.role;
        identity.set_role(role);
        self.repo.save(&mut identity).await?;

        tracing::info!(
            identity_id = %identity.id,
            from = %previous,
            to = %role,
            "Role changed"
        );

        Ok(identity)
    }

    /// Hard delete
    pub async fn delete(&self, id: &IdentityId) -> AuthResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AuthError::not_found("No user found with that ID"));
        }

        tracing::info!(identity_id = %id, "Identity deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::infra::memory::InMemoryIdentityRepository;

    async fn seed(repo: &Arc<InMemoryIdentityRepository>, email: &str) -> Identity {
        SignUpUseCase::new(repo.clone(), Arc::new(AuthConfig::for_testing("secret")))
            .execute(SignUpInput {
                name: "Seed".into(),
                email: email.into(),
                password: "prairie-fox-19".into(),
                password_confirm: "prairie-fox-19".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_get_and_role_change() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let first = seed(&repo, "one@example.com").await;
        seed(&repo, "two@example.com").await;
        let use_case = ManageIdentitiesUseCase::new(repo);

        assert_eq!(use_case.list().await.unwrap().len(), 2);

        let promoted = use_case.set_role(&first.id, Role::Guide).await.unwrap();
        assert_eq!(promoted.role, Role::Guide);
        assert_eq!(use_case.get(&first.id).await.unwrap().role, Role::Guide);
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let identity = seed(&repo, "one@example.com").await;
        let use_case = ManageIdentitiesUseCase::new(repo);

        use_case.delete(&identity.id).await.unwrap();
        assert!(matches!(
            use_case.get(&identity.id).await.unwrap_err(),
            AuthError::NotFound(_)
        ));
        assert!(matches!(
            use_case.delete(&identity.id).await.unwrap_err(),
            AuthError::NotFound(_)
        ));
    }
}
