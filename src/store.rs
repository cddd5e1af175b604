// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded credential/tenant store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → serialized User (JSON bytes)
//! - `user_email_index`: normalized email → user id (unique secondary index)
//! - `colleges`: college id → serialized College (JSON bytes)
//!
//! Read-modify-write updates run inside a single write transaction, so
//! concurrent login-counter updates cannot lose increments.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::auth::TenantScope;
use crate::models::{College, User};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user id → serialized User (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Unique index: normalized email → user id.
const USER_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_email_index");

/// Primary table: college id → serialized College (JSON bytes).
const COLLEGES: TableDefinition<&str, &[u8]> = TableDefinition::new("colleges");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Store
// =============================================================================

/// Embedded ACID credential/tenant store.
pub struct Store {
    db: Database,
}

impl Store {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAIL_INDEX)?;
            let _ = write_txn.open_table(COLLEGES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user (create-if-absent on both id and email).
    ///
    /// The record and its email index entry are written in one
    /// transaction; a duplicate normalized email fails the whole create.
    pub fn create_user(&self, user: &User) -> StoreResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            if users.get(user.id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("User {}", user.id)));
            }

            let mut email_idx = write_txn.open_table(USER_EMAIL_INDEX)?;
            if email_idx.get(user.email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "User email {}",
                    user.email
                )));
            }

            users.insert(user.id.as_str(), json.as_slice())?;
            email_idx.insert(user.email.as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a user by primary id.
    pub fn user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by the unique email index. The caller passes a
    /// normalized email (see [`crate::models::normalize_email`]).
    pub fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let email_idx = read_txn.open_table(USER_EMAIL_INDEX)?;
        let Some(user_id) = email_idx.get(email)?.map(|v| v.value().to_string()) else {
            return Ok(None);
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write a user inside a single write transaction.
    ///
    /// Returns the updated record. If the mutation changes the email,
    /// the unique index is moved in the same transaction.
    pub fn update_user<F>(&self, user_id: &str, mutate: F) -> StoreResult<User>
    where
        F: FnOnce(&mut User),
    {
        let write_txn = self.db.begin_write()?;
        let updated;
        {
            let mut users = write_txn.open_table(USERS)?;
            let Some(bytes) = users.get(user_id)?.map(|v| v.value().to_vec()) else {
                return Err(StoreError::NotFound(format!("User {user_id}")));
            };

            let mut user: User = serde_json::from_slice(&bytes)?;
            let old_email = user.email.clone();
            mutate(&mut user);

            let json = serde_json::to_vec(&user)?;
            users.insert(user_id, json.as_slice())?;

            if user.email != old_email {
                let mut email_idx = write_txn.open_table(USER_EMAIL_INDEX)?;
                if email_idx.get(user.email.as_str())?.is_some() {
                    return Err(StoreError::AlreadyExists(format!(
                        "User email {}",
                        user.email
                    )));
                }
                email_idx.remove(old_email.as_str())?;
                email_idx.insert(user.email.as_str(), user_id)?;
            }

            updated = user;
        }
        write_txn.commit()?;
        Ok(updated)
    }

    /// Full scan of active users.
    pub fn scan_active_users(&self) -> StoreResult<Vec<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let mut users = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let user: User = serde_json::from_slice(value.value())?;
            if user.is_active {
                users.push(user);
            }
        }
        Ok(users)
    }

    /// Scan of active users restricted to a tenant scope.
    ///
    /// Non-superuser callers can only construct a scope naming their own
    /// college, so this cannot leak another tenant's users.
    pub fn scan_users_in_scope(&self, scope: &TenantScope) -> StoreResult<Vec<User>> {
        let users = self.scan_active_users()?;
        Ok(users
            .into_iter()
            .filter(|u| match &u.college_id {
                Some(college_id) => scope.permits(college_id),
                None => matches!(scope, TenantScope::AllColleges),
            })
            .collect())
    }

    // =========================================================================
    // Colleges
    // =========================================================================

    /// Create a college (create-if-absent).
    pub fn create_college(&self, college: &College) -> StoreResult<()> {
        let json = serde_json::to_vec(college)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut colleges = write_txn.open_table(COLLEGES)?;
            if colleges.get(college.id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("College {}", college.id)));
            }
            colleges.insert(college.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a college by primary id.
    pub fn college(&self, college_id: &str) -> StoreResult<Option<College>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLEGES)?;
        match table.get(college_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Full scan of active colleges.
    pub fn scan_active_colleges(&self) -> StoreResult<Vec<College>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLEGES)?;
        let mut colleges = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let college: College = serde_json::from_slice(value.value())?;
            if college.is_active {
                colleges.push(college);
            }
        }
        Ok(colleges)
    }
}
