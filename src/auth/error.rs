// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication/authorization error type.
///
/// The 401 variants are distinguished for logging only; the external
/// contract collapses them to the same status code so a caller cannot
/// probe which stage of authentication failed.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token subject does not resolve to a live user record
    UserNotFoundOrInactive,
    /// Role not in the route's allow-list
    InsufficientPermissions,
    /// Explicit target college differs from the caller's own
    CollegeMismatch,
    /// Token signing failed or another internal fault
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::UserNotFoundOrInactive => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions | AuthError::CollegeMismatch => {
                StatusCode::FORBIDDEN
            }
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                write!(f, "No token, authorization denied")
            }
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired => write!(f, "Token is not valid"),
            AuthError::UserNotFoundOrInactive => write!(f, "User not found or inactive"),
            AuthError::InsufficientPermissions => {
                write!(f, "Access denied. Insufficient permissions.")
            }
            AuthError::CollegeMismatch => {
                write!(f, "Access denied. You can only access your college data.")
            }
            AuthError::InternalError(_) => write!(f, "Server error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::InternalError(detail) = &self {
            tracing::error!(detail = %detail, "internal authentication fault");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "No token, authorization denied");
    }

    #[tokio::test]
    async fn token_failures_share_one_message() {
        for err in [
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], "Token is not valid");
        }
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Access denied. Insufficient permissions.");
    }

    #[tokio::test]
    async fn college_mismatch_returns_403() {
        let response = AuthError::CollegeMismatch.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
