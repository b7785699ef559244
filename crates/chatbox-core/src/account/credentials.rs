//! CredentialHasher trait.
//!
//! Services hash passwords and tokens without coupling to an algorithm. The
//! Argon2/SHA-256 adapter lives in chatbox-infra.

use chatbox_types::error::AccountError;

pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing password hash (PHC string).
    fn hash_password(&self, password: &str) -> Result<String, AccountError>;

    /// Check `password` against a hash produced by [`hash_password`](Self::hash_password).
    /// Malformed hashes verify as `false`.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// A fresh, unguessable bearer token.
    fn generate_token(&self) -> String;

    /// The storage digest of a bearer token.
    fn digest_token(&self, token: &str) -> String;
}
