// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the subject id and role only. The
//! college id is deliberately not embedded; the authentication
//! middleware re-fetches the user record on every request so that
//! deactivation and college reassignment take effect immediately.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Role};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    /// Role at issue time
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

/// Stateless token service.
///
/// A pure function of the signing secret configured at startup; never
/// consults the store.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the configured secret and TTL.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a signed session token for the given subject and role.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("Token signing failed: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails on malformed, expired, or badly signed tokens. Expiry is
    /// enforced with a 60 second leeway.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let token_data = decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issue_verify_round_trip() {
        let svc = service();
        let token = svc.issue("user-1", Role::Faculty).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Faculty);
        assert!(claims.exp - claims.iat == 24 * 3600);
    }

    #[test]
    fn round_trip_holds_for_every_role() {
        let svc = service();
        for role in [
            Role::MasterAdmin,
            Role::CollegeAdmin,
            Role::Faculty,
            Role::Student,
        ] {
            let token = svc.issue("user-x", role).unwrap();
            let claims = svc.verify(&token).unwrap();
            assert_eq!(claims.sub, "user-x");
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL puts the expiry well past the leeway window.
        let svc = TokenService::new(b"test-secret", Duration::hours(-2));
        let token = svc.issue("user-1", Role::Student).unwrap();
        let err = svc.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = service();
        let token = svc.issue("user-1", Role::Student).unwrap();

        let other = TokenService::new(b"other-secret", Duration::hours(24));
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = service();
        let err = svc.verify("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }
}
