// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Roles
///
/// - `MasterAdmin` - Platform superuser, exempt from college scoping
/// - `CollegeAdmin` - Administers a single college
/// - `Faculty` - Faculty member of a college
/// - `Student` - Student of a college
///
/// Role gating is exact-match: `MasterAdmin` is not implicitly granted
/// access to routes that don't list it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform superuser (cross-college reporting, no tenant scoping)
    MasterAdmin,
    /// Administrator of a single college
    CollegeAdmin,
    /// Faculty member
    Faculty,
    /// Student
    Student,
}

impl Role {
    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "master_admin" => Some(Role::MasterAdmin),
            "college_admin" => Some(Role::CollegeAdmin),
            "faculty" => Some(Role::Faculty),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Whether this role belongs to a college (everyone except the superuser).
    ///
    /// College-affiliated roles carry a `college_id` and are the population
    /// reported in recent-login stats.
    pub fn is_college_affiliated(&self) -> bool {
        !matches!(self, Role::MasterAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::MasterAdmin => write!(f, "master_admin"),
            Role::CollegeAdmin => write!(f, "college_admin"),
            Role::Faculty => write!(f, "faculty"),
            Role::Student => write!(f, "student"),
        }
    }
}
