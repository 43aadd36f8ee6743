//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod reset_sender;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, reset_ticket::ResetTicket};
pub use repository::IdentityRepository;
pub use reset_sender::ResetTokenSender;
