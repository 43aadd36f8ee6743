//! Password-Reset Ticket
//!
//! A reset secret is 32 bytes from the OS CSPRNG. The client receives the
//! lowercase hex of those bytes; only `sha256(bytes)` in hex is persisted,
//! so a leaked row cannot be replayed.

use chrono::{DateTime, Duration, Utc};
use platform::crypto;
use std::fmt;

/// Random bytes per reset secret
pub const RESET_TOKEN_BYTES: usize = 32;

/// The secret handed to the delivery channel. Never persisted.
pub struct PlainResetToken(String);

impl PlainResetToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlainResetToken")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Persisted half of a reset secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    /// hex(sha256(secret bytes))
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetTicket {
    /// Fresh secret plus the ticket that matches it, valid for `ttl`
    pub fn generate(now: DateTime<Utc>, ttl: Duration) -> (PlainResetToken, ResetTicket) {
        let bytes = crypto::random_bytes(RESET_TOKEN_BYTES);
        let plain = PlainResetToken(crypto::to_hex(&bytes));
        let ticket = ResetTicket {
            token_hash: crypto::sha256_hex(&bytes),
            expires_at: now + ttl,
        };
        (plain, ticket)
    }

    /// Hash a presented secret for lookup. `None` if it is not valid hex.
    pub fn hash_presented(token: &str) -> Option<String> {
        let bytes = crypto::from_hex(token).ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(crypto::sha256_hex(&bytes))
    }

    /// Expired strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shapes() {
        let now = Utc::now();
        let (plain, ticket) = ResetTicket::generate(now, Duration::minutes(10));

        assert_eq!(plain.as_str().len(), RESET_TOKEN_BYTES * 2);
        assert!(plain.as_str().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(ticket.token_hash.len(), 64);
        assert_eq!(ticket.expires_at, now + Duration::minutes(10));
        assert_ne!(plain.as_str(), ticket.token_hash);
    }

    #[test]
    fn test_presented_secret_matches_only_itself() {
        let (plain, ticket) = ResetTicket::generate(Utc::now(), Duration::minutes(10));
        assert_eq!(
            ResetTicket::hash_presented(plain.as_str()).as_deref(),
            Some(ticket.token_hash.as_str())
        );

        let (other, _) = ResetTicket::generate(Utc::now(), Duration::minutes(10));
        assert_ne!(
            ResetTicket::hash_presented(other.as_str()).as_deref(),
            Some(ticket.token_hash.as_str())
        );
    }

    #[test]
    fn test_hash_presented_rejects_non_hex() {
        assert!(ResetTicket::hash_presented("not-hex!").is_none());
        assert!(ResetTicket::hash_presented("abc").is_none());
        assert!(ResetTicket::hash_presented("").is_none());
    }

    #[test]
    fn test_expiry_edge() {
        let now = Utc::now();
        let (_, ticket) = ResetTicket::generate(now, Duration::minutes(10));
        assert!(!ticket.is_expired_at(now));
        assert!(!ticket.is_expired_at(ticket.expires_at));
        assert!(ticket.is_expired_at(ticket.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_debug_redacts_plain_token() {
        let (plain, _) = ResetTicket::generate(Utc::now(), Duration::minutes(10));
        assert!(!format!("{:?}", plain).contains(plain.as_str()));
    }
}
