//! Session Token Service
//!
//! HS256 JWTs carrying `{sub, iat, exp}`. Expiry is checked here with zero
//! leeway rather than by `jsonwebtoken`, so the `_at` variants can pin the
//! clock in tests.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::{AuthConfig, TOKEN_TTL_SECS};
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::{AuthError, AuthResult};

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id (UUID string)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds), always `iat` + 24 hours
    pub exp: i64,
}

impl Claims {
    pub fn identity_id(&self) -> Result<IdentityId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::InvalidFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    InvalidFormat,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issues and validates session tokens with the server-held secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
        }
    }

    pub fn issue(&self, id: &IdentityId) -> AuthResult<String> {
        self.issue_at(id, Utc::now())
    }

    pub fn issue_at(&self, id: &IdentityId, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: id.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::InvalidFormat,
            }
        })?;

        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::for_testing("unit-test-secret"))
    }

    #[test]
    fn test_issue_sets_24h_expiry() {
        let service = service();
        let id = IdentityId::new();
        let now = Utc::now();
        let token = service.issue_at(&id, now).unwrap();

        let claims = service.validate_at(&token, now).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, claims.iat + 86_400);
        assert_eq!(claims.identity_id().unwrap(), id);
    }

    #[test]
    fn test_expiry_edge() {
        let service = service();
        let issued = Utc::now();
        let token = service.issue_at(&IdentityId::new(), issued).unwrap();

        let exp = issued + Duration::hours(24);
        assert!(service.validate_at(&token, exp).is_ok());
        assert_eq!(
            service.validate_at(&token, exp + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let service = service();
        let token = service.issue(&IdentityId::new()).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = signature.chars().collect();
        sig[0] = if sig[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{}", sig.into_iter().collect::<String>());

        assert_eq!(service.validate(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let token = service().issue(&IdentityId::new()).unwrap();
        let other = TokenService::new(&AuthConfig::for_testing("rotated-secret"));
        assert_eq!(other.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let service = service();
        assert_eq!(service.validate(""), Err(TokenError::InvalidFormat));
        assert_eq!(service.validate("a.b"), Err(TokenError::InvalidFormat));
        assert_eq!(service.validate("not a jwt"), Err(TokenError::InvalidFormat));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub: "42".into(),
            iat: 0,
            exp: 1,
        };
        assert_eq!(claims.identity_id(), Err(TokenError::InvalidFormat));
    }
}
