//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (CSPRNG bytes, SHA-256, hex, constant-time compare)
//! - Password hashing (Argon2id, NIST SP 800-63B style policy)
//! - Set-Cookie header building

pub mod cookie;
pub mod crypto;
pub mod password;
