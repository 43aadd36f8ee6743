//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{AuthAppState, issue_and_respond};
pub use middleware::{require_auth, restrict_to};
pub use router::{auth_router, auth_router_generic};
