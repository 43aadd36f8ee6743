//! Application Configuration
//!
//! Configuration for the Auth application layer, read once at startup and
//! shared as `Arc<AuthConfig>`.

use std::env;
use std::fmt;

use chrono::TimeDelta;
use platform::cookie::{CredentialCookie, SameSite};
use platform::password::HashCost;
use thiserror::Error;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE_NAME: &str = "jwt";

/// Session token lifetime. Fixed: `exp` is always `iat` + 24 hours.
pub const TOKEN_TTL_SECS: i64 = 24 * 3600;

const DEFAULT_RESET_TTL_SECS: i64 = 10 * 60;
/// Accepted range for `PASSWORD_RESET_TTL_SECS`
const RESET_TTL_RANGE_SECS: std::ops::RangeInclusive<i64> = 1..=24 * 3600;
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} is no longer configurable; unset it")]
    Unsupported { var: &'static str },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 key. The same secret signs and verifies.
    pub jwt_secret: Vec<u8>,
    /// Reset ticket lifetime, 10 minutes unless overridden
    pub reset_ttl: TimeDelta,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Argon2id cost for new hashes
    pub hash_cost: HashCost,
    /// Origin used to build reset links, without trailing slash
    pub public_base_url: String,
    /// Print live reset links in the log. Local development only.
    pub log_reset_links: bool,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            reset_ttl: TimeDelta::seconds(DEFAULT_RESET_TTL_SECS),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            hash_cost: HashCost::default(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            log_reset_links: false,
        }
    }

    /// Build from the process environment
    ///
    /// `JWT_SECRET` is required. `PASSWORD_RESET_TTL_SECS` (1..=86400),
    /// `COOKIE_SECURE`, `PUBLIC_BASE_URL` and `LOG_RESET_LINKS` are optional.
    /// The token lifetime is fixed, so a leftover `JWT_TTL_SECS` is refused.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let mut config = Self::new(secret.into_bytes());

        if env::var_os("JWT_TTL_SECS").is_some() {
            return Err(ConfigError::Unsupported {
                var: "JWT_TTL_SECS",
            });
        }
        if let Ok(value) = env::var("PASSWORD_RESET_TTL_SECS") {
            config.reset_ttl = parse_reset_ttl(&value)?;
        }
        if let Some(secure) = parse_var::<bool>("COOKIE_SECURE")? {
            config.cookie_secure = secure;
        }
        if let Some(log_links) = parse_var::<bool>("LOG_RESET_LINKS")? {
            config.log_reset_links = log_links;
        }
        if let Ok(url) = env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Insecure cookie and minimal Argon2 cost
    pub fn for_testing(secret: &str) -> Self {
        Self {
            cookie_secure: false,
            hash_cost: HashCost::minimal(),
            ..Self::new(secret.as_bytes().to_vec())
        }
    }

    /// Cookie that carries the session token, expiring with it
    pub fn token_cookie(&self) -> CredentialCookie {
        CredentialCookie::new(TOKEN_COOKIE_NAME)
            .secure(self.cookie_secure)
            .same_site(self.cookie_same_site)
            .max_age_secs(TOKEN_TTL_SECS)
    }

    pub fn reset_url(&self, plain_token: &str) -> String {
        format!(
            "{}/api/v1/users/reset-password/{}",
            self.public_base_url, plain_token
        )
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("reset_ttl", &self.reset_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("hash_cost", &self.hash_cost)
            .field("public_base_url", &self.public_base_url)
            .field("log_reset_links", &self.log_reset_links)
            .finish()
    }
}

/// Whole seconds within `RESET_TTL_RANGE_SECS`
fn parse_reset_ttl(value: &str) -> Result<TimeDelta, ConfigError> {
    let invalid = || ConfigError::Invalid {
        var: "PASSWORD_RESET_TTL_SECS",
        value: value.to_string(),
    };

    let secs: i64 = value.trim().parse().map_err(|_| invalid())?;
    if !RESET_TTL_RANGE_SECS.contains(&secs) {
        return Err(invalid());
    }
    TimeDelta::try_seconds(secs).ok_or_else(invalid)
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}
