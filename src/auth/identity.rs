// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolved request identity and tenant scoping.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use super::{AuthError, Role};
use crate::models::User;

/// Identity resolved by the authentication middleware.
///
/// Built from a fresh store fetch on every request, so it reflects the
/// current record rather than the claims frozen into the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Canonical user id (token `sub` claim)
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Normalized email
    pub email: String,
    /// Current role from the store
    pub role: Role,
    /// Owning college (None only for master_admin)
    pub college_id: Option<String>,
    /// Active flag at resolution time (always true once attached)
    pub is_active: bool,
}

impl AuthIdentity {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            college_id: user.college_id.clone(),
            is_active: user.is_active,
        }
    }

    pub fn is_master_admin(&self) -> bool {
        self.role == Role::MasterAdmin
    }

    /// The scan scope this identity is allowed to query with.
    ///
    /// Non-superuser callers can only obtain a scope naming their own
    /// college, which is what keeps every tenant-scoped store query
    /// filtered even when the request carries no explicit college id.
    pub fn scope(&self) -> Result<TenantScope, AuthError> {
        if self.is_master_admin() {
            return Ok(TenantScope::AllColleges);
        }
        match &self.college_id {
            Some(college_id) => Ok(TenantScope::College(college_id.clone())),
            // A college-affiliated user without a college is a data fault.
            None => Err(AuthError::InternalError(format!(
                "user {} has role {} but no college",
                self.user_id, self.role
            ))),
        }
    }
}

/// Scope value threaded through tenant-scoped store scans.
///
/// `AllColleges` is only constructible via a master_admin identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantScope {
    AllColleges,
    College(String),
}

impl TenantScope {
    pub fn permits(&self, college_id: &str) -> bool {
        match self {
            TenantScope::AllColleges => true,
            TenantScope::College(own) => own == college_id,
        }
    }
}

/// Extractor for the identity attached by the authentication middleware.
///
/// ```rust,ignore
/// async fn handler(Identity(user): Identity) -> impl IntoResponse {
///     // user is AuthIdentity
/// }
/// ```
pub struct Identity(pub AuthIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .map(Identity)
            .ok_or(AuthError::MissingAuthHeader)
    }
}
