// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, current-identity and password-change endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Identity, Role};
use crate::error::ApiError;
use crate::models::{is_valid_email, normalize_email, User};
use crate::state::AppState;

use super::college_display_name;

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Sanitized user profile returned to clients. Never carries the
/// password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub college_id: Option<String>,
    /// Best-effort display name of the owning college; null when the
    /// lookup fails or the user has no college
    pub college_name: Option<String>,
    pub has_logged_in: bool,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,
}

impl UserProfile {
    fn from_user(user: User, college_name: Option<String>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            college_id: user.college_id,
            college_name,
            has_logged_in: user.has_logged_in,
            last_login: user.last_login,
            branch: user.branch,
            batch: user.batch,
            section: user.section,
            phone_number: user.phone_number,
            company_name: user.company_name,
            company_address: user.company_address,
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Message-only response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Uniform login/password failure. Unknown email, inactive account and
/// wrong password must be indistinguishable to prevent enumeration.
fn invalid_credentials() -> ApiError {
    ApiError::bad_request("Invalid credentials")
}

/// Log in with email and password.
///
/// Issues a 24-hour session token and returns the sanitized profile.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and user profile", body = LoginResponse),
        (status = 400, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    tracing::info!(email = %email, "login attempt");

    let user = state.store.user_by_email(&email)?;
    let Some(user) = user.filter(|u| u.is_active) else {
        tracing::warn!(email = %email, "login failed - user not found or inactive");
        return Err(invalid_credentials());
    };

    if !state.passwords.verify(&request.password, &user.password_hash) {
        tracing::warn!(user_id = %user.id, "login failed - invalid password");
        return Err(invalid_credentials());
    }

    // Counter update runs inside one write transaction; concurrent
    // logins cannot lose increments.
    let user = state.store.update_user(&user.id, |u| {
        u.last_login = Some(Utc::now());
        u.has_logged_in = true;
        u.login_count += 1;
    })?;

    let token = state.tokens.issue(&user.id, user.role)?;
    let college_name = college_display_name(&state, user.college_id.as_deref());

    tracing::info!(user_id = %user.id, role = %user.role, "login successful");

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from_user(user, college_name),
    }))
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn current_user(
    Identity(identity): Identity,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .store
        .user(&identity.user_id)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let college_name = college_display_name(&state, user.college_id.as_deref());
    Ok(Json(UserProfile::from_user(user, college_name)))
}

/// Change the caller's password.
///
/// The current password is re-verified before the new Argon2id hash is
/// persisted.
#[utoipa::path(
    post,
    path = "/change-password",
    tag = "Session",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_password(
    Identity(identity): Identity,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.new_password.is_empty() {
        return Err(ApiError::bad_request("New password is required"));
    }

    let user = state
        .store
        .user(&identity.user_id)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !state
        .passwords
        .verify(&request.current_password, &user.password_hash)
    {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    let new_hash = state.passwords.hash(&request.new_password)?;
    state.store.update_user(&user.id, |u| {
        u.password_hash = new_hash;
    })?;

    tracing::info!(user_id = %identity.user_id, "password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "Admin".to_string(),
            role: Role::MasterAdmin,
            college_id: None,
            is_active: true,
            has_logged_in: true,
            last_login: Some(Utc::now()),
            login_count: 3,
            branch: None,
            batch: None,
            section: None,
            phone_number: None,
            company_name: None,
            company_address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_never_contains_password_hash() {
        let profile = UserProfile::from_user(sample_user(), None);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn profile_uses_camel_case_fields() {
        let mut user = sample_user();
        user.college_id = Some("c-1".to_string());
        user.phone_number = Some("555-0100".to_string());
        let profile = UserProfile::from_user(user, Some("Example College".to_string()));
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&profile).unwrap()).unwrap();
        assert_eq!(json["collegeId"], "c-1");
        assert_eq!(json["collegeName"], "Example College");
        assert_eq!(json["hasLoggedIn"], true);
        assert_eq!(json["phoneNumber"], "555-0100");
    }

    #[test]
    fn absent_profile_extras_are_omitted() {
        let profile = UserProfile::from_user(sample_user(), None);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&profile).unwrap()).unwrap();
        assert!(json.get("branch").is_none());
        assert!(json.get("companyName").is_none());
        // collegeName is part of the stable contract and stays, as null.
        assert!(json["collegeName"].is_null());
    }

    #[test]
    fn change_password_request_is_camel_case() {
        let request: ChangePasswordRequest = serde_json::from_str(
            r#"{"currentPassword":"old","newPassword":"new"}"#,
        )
        .unwrap();
        assert_eq!(request.current_password, "old");
        assert_eq!(request.new_password, "new");
    }
}
