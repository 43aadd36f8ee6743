//! Reset Token Delivery
//!
//! Outbound port for handing a reset link to the account owner.

use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[trait_variant::make(ResetTokenSender: Send)]
pub trait LocalResetTokenSender {
    /// Deliver `reset_url` to `email`. An error means the owner was not reached.
    async fn send_reset(&self, email: &Email, reset_url: &str) -> AuthResult<()>;
}
