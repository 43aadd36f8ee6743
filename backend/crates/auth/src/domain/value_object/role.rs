use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles an identity can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Guide, Role::LeadGuide, Role::Admin];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            User => "user",
            Guide => "guide",
            LeadGuide => "lead-guide",
            Admin => "admin",
        }
    }

    pub fn from_code(code: &str) -> AppResult<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.code() == code)
            .ok_or_else(|| {
                AppError::bad_request(format!("Unknown role: {code}"))
                    .with_action("Use one of: user, guide, lead-guide, admin")
            })
    }

    #[inline]
    pub fn is_one_of(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Role::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_code() {
        assert_eq!(Role::from_code("user").unwrap(), Role::User);
        assert_eq!(Role::from_code("guide").unwrap(), Role::Guide);
        assert_eq!(Role::from_code("lead-guide").unwrap(), Role::LeadGuide);
        assert_eq!(Role::from_code("admin").unwrap(), Role::Admin);
    }

    #[test]
    fn test_unknown_role_is_validation_error() {
        let err = Role::from_code("superuser").unwrap_err();
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::BadRequest);
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_display_matches_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_is_one_of() {
        assert!(Role::Admin.is_one_of(&[Role::Admin, Role::LeadGuide]));
        assert!(!Role::User.is_one_of(&[Role::Admin]));
        assert!(!Role::Admin.is_one_of(&[]));
    }
}
