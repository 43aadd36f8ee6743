//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every crate in the backend:
//! - The unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed identifiers ([`id::Id`])
//!
//! Only things whose meaning is identical across bounded contexts live here.

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
