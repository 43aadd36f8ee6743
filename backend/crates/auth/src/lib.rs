//! Auth (Authentication) Backend Module
//!
//! Account and session handling for the tours API.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and delivery traits
//! - `application/` - Use cases, token service, gatekeeper
//! - `infra/` - Postgres and in-memory repositories, reset link delivery
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Stateless HS256 session tokens (`sub`, `iat`, `exp`), 24h lifetime
//! - Tokens issued before a password change are rejected
//! - Reset secrets are single-use, expire after 10 minutes and are stored hashed
//! - Role restriction (`user`, `guide`, `lead-guide`, `admin`) layered after authentication

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult, UnauthorizedReason};
pub use infra::{InMemoryIdentityRepository, LogResetTokenSender, PgIdentityRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
