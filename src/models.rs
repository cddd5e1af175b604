// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain records persisted in the store.
//!
//! These are the storage representations; API responses use the
//! sanitized types in `api` (the password hash never leaves the store
//! layer except for verification during login and password change).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::auth::Role;

/// Normalize an email address for the unique index: NFKC, lowercase,
/// surrounding whitespace stripped.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Basic shape check for an email address. Full RFC validation is not
/// the goal; this rejects obviously malformed input before the store
/// lookup.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique id (UUID)
    pub id: String,
    /// Globally unique, normalized email
    pub email: String,
    /// Argon2id PHC hash; never serialized to API clients
    pub password_hash: String,
    /// Display name
    pub name: String,
    pub role: Role,
    /// Owning college; None only for master_admin
    pub college_id: Option<String>,
    /// Soft-deactivation flag; inactive users fail authentication
    pub is_active: bool,
    #[serde(default)]
    pub has_logged_in: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_count: u64,
    // Profile fields (student/faculty metadata)
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tenant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    /// Unique id (UUID)
    pub id: String,
    pub name: String,
    pub code: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub total_faculty: u64,
    #[serde(default)]
    pub total_students: u64,
    /// Weak reference to the administering user; not transactionally
    /// enforced against that user's college_id
    #[serde(default)]
    pub admin_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
        assert_eq!(normalize_email("a@b.co"), "a@b.co");
    }

    #[test]
    fn normalize_email_applies_nfkc() {
        // Fullwidth letters fold to ASCII under NFKC.
        assert_eq!(normalize_email("ａｄｍｉｎ@example.com"), "admin@example.com");
    }

    #[test]
    fn email_shape_validation() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn user_round_trips_through_json() {
        let user = User {
            id: "u-1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            name: "Admin".to_string(),
            role: Role::MasterAdmin,
            college_id: None,
            is_active: true,
            has_logged_in: false,
            last_login: None,
            login_count: 0,
            branch: None,
            batch: None,
            section: None,
            phone_number: None,
            company_name: None,
            company_address: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec(&user).unwrap();
        let back: User = serde_json::from_slice(&json).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.role, Role::MasterAdmin);
    }
}
