//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod postgres;
pub mod reset_sender;

pub use memory::InMemoryIdentityRepository;
pub use postgres::PgIdentityRepository;
pub use reset_sender::LogResetTokenSender;
