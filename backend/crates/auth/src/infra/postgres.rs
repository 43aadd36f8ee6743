//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{identity::Identity, reset_ticket::ResetTicket};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, identity_id::IdentityId, role::Role,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
const EMAIL_UNIQUE_CONSTRAINT: &str = "identities_email_key";

const SELECT_IDENTITY: &str = r#"
    SELECT
        id,
        name,
        email,
        photo,
        role,
        password_hash,
        password_changed_at,
        reset_token_hash,
        reset_token_expires_at,
        active,
        created_at,
        updated_at,
        version
    FROM identities
"#;

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop reset tickets past their expiry
    pub async fn clear_expired_reset_tickets(&self) -> AuthResult<u64> {
        let cleared = sqlx::query(
            r#"
            UPDATE identities
            SET reset_token_hash = NULL, reset_token_expires_at = NULL
            WHERE reset_token_expires_at < $1
            "#,
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(tickets_cleared = cleared, "Cleared expired reset tickets");

        Ok(cleared)
    }
}

/// Unique violations on `email` surface as `EmailTaken`
fn map_write_error(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db)
            if db.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) =>
        {
            AuthError::EmailTaken
        }
        _ => AuthError::Database(err),
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let (reset_token_hash, reset_token_expires_at) = ticket_columns(identity);

        sqlx::query(
            r#"
            INSERT INTO identities (
                id,
                name,
                email,
                photo,
                role,
                password_hash,
                password_changed_at,
                reset_token_hash,
                reset_token_expires_at,
                active,
                created_at,
                updated_at,
                version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(identity.id.as_uuid())
        .bind(identity.name.as_str())
        .bind(identity.email.as_str())
        .bind(&identity.photo)
        .bind(identity.role.code())
        .bind(identity.password.as_phc_string())
        .bind(identity.password_changed_at)
        .bind(reset_token_hash)
        .bind(reset_token_expires_at)
        .bind(identity.active)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .bind(identity.version)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &IdentityId) -> AuthResult<Option<Identity>> {
        let sql = format!("{SELECT_IDENTITY} WHERE id = $1");
        sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(IdentityRow::into_identity)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let sql = format!("{SELECT_IDENTITY} WHERE email = $1");
        sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(IdentityRow::into_identity)
            .transpose()
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<Identity>> {
        let sql = format!("{SELECT_IDENTITY} WHERE reset_token_hash = $1");
        sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?
            .map(IdentityRow::into_identity)
            .transpose()
    }

    async fn save(&self, identity: &mut Identity) -> AuthResult<()> {
        let (reset_token_hash, reset_token_expires_at) = ticket_columns(identity);

        let updated = sqlx::query(
            r#"
            UPDATE identities SET
                name = $2,
                email = $3,
                photo = $4,
                role = $5,
                password_hash = $6,
                password_changed_at = $7,
                reset_token_hash = $8,
                reset_token_expires_at = $9,
                active = $10,
                updated_at = $11,
                version = version + 1
            WHERE id = $1 AND version = $12
            "#,
        )
        .bind(identity.id.as_uuid())
        .bind(identity.name.as_str())
        .bind(identity.email.as_str())
        .bind(&identity.photo)
        .bind(identity.role.code())
        .bind(identity.password.as_phc_string())
        .bind(identity.password_changed_at)
        .bind(reset_token_hash)
        .bind(reset_token_expires_at)
        .bind(identity.active)
        .bind(identity.updated_at)
        .bind(identity.version)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?
        .rows_affected();

        if updated == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM identities WHERE id = $1)")
                    .bind(identity.id.as_uuid())
                    .fetch_one(&self.pool)
                    .await?;

            return Err(if exists {
                AuthError::StaleWrite
            } else {
                AuthError::not_found("No user found with that ID")
            });
        }

        identity.version += 1;
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        let sql = format!("{SELECT_IDENTITY} ORDER BY created_at, id");
        sqlx::query_as::<_, IdentityRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(IdentityRow::into_identity)
            .collect()
    }
}

fn ticket_columns(identity: &Identity) -> (Option<&str>, Option<DateTime<Utc>>) {
    match &identity.reset_ticket {
        Some(ticket) => (Some(ticket.token_hash.as_str()), Some(ticket.expires_at)),
        None => (None, None),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    name: String,
    email: String,
    photo: String,
    role: String,
    password_hash: String,
    password_changed_at: Option<DateTime<Utc>>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let role = Role::from_code(&self.role)
            .map_err(|e| AuthError::Internal(format!("Invalid role in row {}: {}", self.id, e)))?;

        let password = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        let reset_ticket = match (self.reset_token_hash, self.reset_token_expires_at) {
            (Some(token_hash), Some(expires_at)) => Some(ResetTicket {
                token_hash,
                expires_at,
            }),
            _ => None,
        };

        Ok(Identity {
            id: IdentityId::from_uuid(self.id),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            photo: self.photo,
            role,
            password,
            password_changed_at: self.password_changed_at,
            reset_ticket,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        })
    }
}
