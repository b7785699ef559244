//! Argon2id password hashing and SHA-256 token digests.
//!
//! Implements `CredentialHasher` from `chatbox-core` with the RustCrypto
//! `argon2` and `sha2` crates.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use chatbox_core::account::credentials::CredentialHasher;
use chatbox_types::error::AccountError;

/// Prefix that makes leaked tokens easy to recognise in logs and scanners.
pub const TOKEN_PREFIX: &str = "cbx_";

/// Random bytes per bearer token.
const TOKEN_BYTES: usize = 32;

/// Argon2id (default parameters) for passwords, SHA-256 for token digests.
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AccountError::Hashing
            })
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{TOKEN_PREFIX}{hex}")
    }

    fn digest_token(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
