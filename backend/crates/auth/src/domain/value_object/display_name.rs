//! Display Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

const NAME_MAX_CHARS: usize = 100;

/// Human-readable account name, trimmed and 1..=100 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl AsRef<str>) -> AppResult<Self> {
        let name = name.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Please tell us your name"));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                NAME_MAX_CHARS
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
