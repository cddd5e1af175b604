// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus Server - Academic Assessment Platform Backend
//!
//! REST backend for a multi-tenant test and assessment platform:
//! JWT-authenticated sessions, role-based access control, per-college
//! tenant scoping and cross-college admin reporting, backed by an
//! embedded redb store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, passwords, identity and access middleware
//! - `store` - Embedded persistence (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
