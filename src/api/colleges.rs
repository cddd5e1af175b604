// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! College-scoped endpoints available to every authenticated role.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

/// College summary visible to its own members.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeProfile {
    pub id: String,
    pub name: String,
    pub code: String,
    pub email: String,
    pub address: String,
    pub total_faculty: u64,
    pub total_students: u64,
    pub created_at: DateTime<Utc>,
}

/// Get a college summary.
///
/// The tenant gate in front of this route rejects non-superuser callers
/// whose own college differs from `college_id`.
#[utoipa::path(
    get,
    path = "/colleges/{college_id}",
    tag = "Colleges",
    security(("bearer_auth" = [])),
    params(("college_id" = String, Path, description = "College id")),
    responses(
        (status = 200, description = "College summary", body = CollegeProfile),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "College belongs to another tenant"),
        (status = 404, description = "College not found")
    )
)]
pub async fn get_college(
    Path(college_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CollegeProfile>, ApiError> {
    let college = state
        .store
        .college(&college_id)?
        .filter(|c| c.is_active)
        .ok_or_else(|| ApiError::not_found("College not found"))?;

    Ok(Json(CollegeProfile {
        id: college.id,
        name: college.name,
        code: college.code,
        email: college.email,
        address: college.address,
        total_faculty: college.total_faculty,
        total_students: college.total_students,
        created_at: college.created_at,
    }))
}
