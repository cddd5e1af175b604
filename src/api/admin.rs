// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-college admin reporting endpoints.
//!
//! Master-admin only (enforced by the route policy layer). Both
//! endpoints are read-only scans with best-effort per-item enrichment:
//! a failed admin or college-name lookup degrades that item to a null
//! field instead of failing the request.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Role;
use crate::error::ApiError;
use crate::models::College;
use crate::state::AppState;

use super::college_display_name;

// ============================================================================
// Response Types
// ============================================================================

/// Administrator summary attached to a college listing item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub name: String,
    pub email: String,
    pub has_logged_in: bool,
    pub last_login: Option<DateTime<Utc>>,
}

/// College listing item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeSummary {
    pub id: String,
    pub name: String,
    pub code: String,
    pub email: String,
    pub address: String,
    pub total_faculty: u64,
    pub total_students: u64,
    /// Null when the college has no admin or the enrichment lookup failed
    pub admin_info: Option<AdminInfo>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// One entry in the recent-logins report.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentLogin {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub last_login: DateTime<Utc>,
    pub college_id: Option<String>,
    /// Best-effort college display name; null on lookup failure
    pub college_name: Option<String>,
}

/// Aggregate platform statistics.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_colleges: usize,
    pub total_faculty: usize,
    pub total_students: usize,
    pub recent_logins: Vec<RecentLogin>,
}

/// How many recent logins the stats report carries.
const RECENT_LOGIN_LIMIT: usize = 10;

// ============================================================================
// Handlers
// ============================================================================

/// List all active colleges with administrator summaries.
///
/// Ordered newest-first by creation time. A failed per-college admin
/// lookup yields `adminInfo: null` for that college only.
#[utoipa::path(
    get,
    path = "/admin/colleges",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active colleges", body = [CollegeSummary]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (master_admin required)")
    )
)]
pub async fn list_colleges(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollegeSummary>>, ApiError> {
    let colleges = state.store.scan_active_colleges()?;

    let mut summaries: Vec<CollegeSummary> = colleges
        .into_iter()
        .map(|college| {
            let admin_info = resolve_admin_info(&state, &college);
            CollegeSummary {
                id: college.id,
                name: college.name,
                code: college.code,
                email: college.email,
                address: college.address,
                total_faculty: college.total_faculty,
                total_students: college.total_students,
                admin_info,
                created_at: college.created_at,
                is_active: college.is_active,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(summaries))
}

/// Aggregate statistics: role counts and the most recent logins.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate statistics", body = StatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (master_admin required)")
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let colleges = state.store.scan_active_colleges()?;
    let users = state.store.scan_active_users()?;

    let total_faculty = users.iter().filter(|u| u.role == Role::Faculty).count();
    let total_students = users.iter().filter(|u| u.role == Role::Student).count();

    let mut logged_in: Vec<_> = users
        .into_iter()
        .filter(|u| u.role.is_college_affiliated() && u.last_login.is_some())
        .collect();
    logged_in.sort_by(|a, b| b.last_login.cmp(&a.last_login));

    let recent_logins = logged_in
        .into_iter()
        .take(RECENT_LOGIN_LIMIT)
        .map(|user| {
            let college_name = college_display_name(&state, user.college_id.as_deref());
            RecentLogin {
                name: user.name,
                email: user.email,
                role: user.role,
                // Filter above guarantees presence.
                last_login: user.last_login.unwrap_or_default(),
                college_id: user.college_id,
                college_name,
            }
        })
        .collect();

    Ok(Json(StatsResponse {
        total_colleges: colleges.len(),
        total_faculty,
        total_students,
        recent_logins,
    }))
}

/// Best-effort admin enrichment for one college.
fn resolve_admin_info(state: &AppState, college: &College) -> Option<AdminInfo> {
    let admin_id = college.admin_id.as_deref()?;
    match state.store.user(admin_id) {
        Ok(Some(admin)) => Some(AdminInfo {
            name: admin.name,
            email: admin.email,
            has_logged_in: admin.has_logged_in,
            last_login: admin.last_login,
        }),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(
                college_id = %college.id,
                admin_id = %admin_id,
                error = %e,
                "failed to fetch admin info"
            );
            None
        }
    }
}
