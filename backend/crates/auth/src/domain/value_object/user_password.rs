//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. Policy violations become
//! user-facing 400 errors; hashing failures become internal errors.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::HashCost;
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, &HashCost::minimal()).unwrap();
//! assert!(hashed.verify(&RawPassword::candidate("MySecurePass123!".to_string())));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashCost, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized when dropped
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A newly chosen password (signup, reset, change)
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let action = match e {
                PasswordPolicyError::TooShort { .. } => "Please choose a longer password",
                PasswordPolicyError::TooLong { .. } => "Please choose a shorter password",
                PasswordPolicyError::EmptyOrWhitespace => "Please enter a password",
                PasswordPolicyError::InvalidCharacter => {
                    "Please remove any special control characters"
                }
                PasswordPolicyError::CommonPattern => "Please choose a more unique password",
            };
            AppError::bad_request(e.to_string()).with_action(action)
        })?;

        Ok(Self(clear_text))
    }

    /// A password presented for verification; never fails validation
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string as stored on the identity
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, cost: &HashCost) -> AppResult<Self> {
        let hashed = raw
            .0
            .hash(cost)
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))?;
        Ok(Self(hashed))
    }

    /// Parse a stored PHC string
    pub fn from_phc_string(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AppError::internal("Stored password hash is corrupt").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `verify(candidate, stored)`: the candidate is always the plaintext side
    pub fn verify(&self, candidate: &RawPassword) -> bool {
        self.0.verify(&candidate.0)
    }

    pub fn needs_rehash(&self, cost: &HashCost) -> bool {
        self.0.needs_rehash(cost)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
