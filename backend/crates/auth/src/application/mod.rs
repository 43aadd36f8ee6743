//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod forgot_password;
pub mod gatekeeper;
pub mod manage_identities;
pub mod profile;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod token;
pub mod update_password;

// Re-exports
pub use config::AuthConfig;
pub use forgot_password::ForgotPasswordUseCase;
pub use gatekeeper::{CurrentIdentity, Gatekeeper, authorize};
pub use manage_identities::ManageIdentitiesUseCase;
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::{Claims, TokenError, TokenService};
pub use update_password::{UpdatePasswordInput, UpdatePasswordUseCase};
