//! Cryptographic operations for chatbox.
//!
//! - `credentials`: Argon2id password hashes and SHA-256 bearer-token digests

pub mod credentials;
