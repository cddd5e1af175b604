// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! Three layers compose per route:
//!
//! 1. `authenticate` - resolves the bearer token to a live user record
//!    and attaches an [`AuthIdentity`] to the request extensions.
//! 2. `authorize` - checks the resolved role against a declarative
//!    [`RoutePolicy`] (exact-match allow-list, no hierarchy).
//! 3. `college_access` - rejects explicit cross-college path parameters
//!    for non-superuser callers.

use axum::{
    extract::{Path, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
    RequestExt,
};
use std::collections::HashMap;

use super::{AuthError, AuthIdentity, Role};
use crate::state::AppState;

/// Declarative allow-list of roles for a route.
///
/// Evaluated by the single reusable [`authorize`] middleware rather than
/// per-route closures. Gating is exact-match: `master_admin` must be
/// listed explicitly to pass.
#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    allowed: &'static [Role],
}

impl RoutePolicy {
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Policy for the cross-college admin reporting routes.
pub const MASTER_ADMIN_ONLY: RoutePolicy = RoutePolicy::new(&[Role::MasterAdmin]);

/// Pulls the token out of the `Authorization: Bearer <token>` header.
fn bearer_token(request: &Request) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;
    let header = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Authentication middleware.
///
/// Extracts the bearer token, verifies it, then re-fetches the subject
/// from the store. The re-fetch is one lookup per request but makes
/// deactivation effective immediately: an inactive or deleted user is
/// rejected even with an unexpired, correctly signed token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "authentication failed - no token provided");
            return e.into_response();
        }
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "authentication failed - invalid token");
            return e.into_response();
        }
    };

    let user = match state.store.user(&claims.sub) {
        Ok(user) => user,
        Err(e) => {
            return AuthError::InternalError(format!("user lookup failed: {e}")).into_response();
        }
    };

    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            tracing::warn!(user_id = %claims.sub, "authentication failed - user not found or inactive");
            return AuthError::UserNotFoundOrInactive.into_response();
        }
    };

    tracing::debug!(user_id = %user.id, role = %user.role, path = %request.uri().path(), "authentication successful");
    request.extensions_mut().insert(AuthIdentity::from_user(&user));
    next.run(request).await
}

/// Role-gate middleware.
///
/// Use with a closure capturing the route's policy:
///
/// ```rust,ignore
/// .layer(middleware::from_fn(move |req, next| {
///     authorize(MASTER_ADMIN_ONLY, req, next)
/// }))
/// ```
pub async fn authorize(policy: RoutePolicy, request: Request, next: Next) -> Response {
    let Some(identity) = request.extensions().get::<AuthIdentity>() else {
        return AuthError::MissingAuthHeader.into_response();
    };

    if !policy.permits(identity.role) {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            path = %request.uri().path(),
            "authorization failed - insufficient permissions"
        );
        return AuthError::InsufficientPermissions.into_response();
    }

    next.run(request).await
}

/// Tenant-gate middleware for routes carrying a `college_id` path parameter.
///
/// Guards explicit cross-college parameter tampering only; scan-level
/// scoping is enforced separately through [`super::TenantScope`].
pub async fn college_access(mut request: Request, next: Next) -> Response {
    let Some(identity) = request.extensions().get::<AuthIdentity>().cloned() else {
        return AuthError::MissingAuthHeader.into_response();
    };

    let requested = match request
        .extract_parts::<Path<HashMap<String, String>>>()
        .await
    {
        Ok(Path(params)) => params.get("college_id").cloned(),
        Err(_) => None,
    };

    if let Err(e) = ensure_college_access(&identity, requested.as_deref()) {
        return e.into_response();
    }

    next.run(request).await
}

/// The tenant gate itself, shared between the path-param middleware and
/// handlers that read a college id from a request body.
///
/// `master_admin` bypasses scoping unconditionally. For every other role
/// an explicit target college must equal the caller's own; absence of a
/// target passes (the route's store queries still filter by scope).
pub fn ensure_college_access(
    identity: &AuthIdentity,
    requested: Option<&str>,
) -> Result<(), AuthError> {
    if identity.is_master_admin() {
        tracing::debug!(user_id = %identity.user_id, "college access granted - master admin");
        return Ok(());
    }

    if let Some(requested) = requested {
        if identity.college_id.as_deref() != Some(requested) {
            tracing::warn!(
                user_id = %identity.user_id,
                user_college_id = ?identity.college_id,
                requested_college_id = %requested,
                "college access denied - different college"
            );
            return Err(AuthError::CollegeMismatch);
        }
    }

    Ok(())
}
