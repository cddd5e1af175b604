// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT session authentication and role/college authorization.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email/password and receives an HS256 JWT
//!    carrying `{sub, role}` with a 24-hour expiry
//! 2. Client sends `Authorization: Bearer <JWT>` on every request
//! 3. Server:
//!    - Verifies signature and expiry (60 s clock-skew leeway)
//!    - Re-fetches the user record by `sub` and rejects inactive users
//!    - Attaches the resolved [`AuthIdentity`] for downstream checks
//!
//! ## Security
//!
//! - Tokens are stateless; there is no revocation list. Deactivating a
//!   user takes effect on their next request via the per-request fetch.
//! - Role gating is exact-match per route ([`middleware::RoutePolicy`]).
//! - College scoping is enforced both at the request boundary
//!   ([`middleware::college_access`]) and at scan time ([`TenantScope`]).

pub mod error;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use error::AuthError;
pub use identity::{AuthIdentity, Identity, TenantScope};
pub use password::PasswordHasher;
pub use roles::Role;
pub use token::TokenService;
