// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with Argon2id.
//!
//! Stored hashes are PHC-formatted strings. Verification failure and
//! hash-format failure are both reported as a non-match so login error
//! paths stay indistinguishable.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, SaltString},
    Argon2, PasswordVerifier,
};

use super::AuthError;

/// Password hasher using Argon2id with the crate's default parameters
/// (19 MiB memory, 2 iterations).
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password, producing a PHC-formatted string with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// Returns `false` for both a non-matching password and an unparseable
    /// hash; the caller cannot tell the cases apart.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("Admin@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("Admin@123", &hash));
        assert!(!hasher.verify("wrong-password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_stored_hash_never_matches() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("anything", "not-a-phc-hash"));
        assert!(!hasher.verify("anything", ""));
    }
}
