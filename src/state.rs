// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::store::{Store, StoreResult};

/// Shared application state: store handle, token service, and password
/// hasher, all constructed once at startup from [`AppConfig`].
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
}

impl AppState {
    /// Build the application state from configuration.
    pub fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let store = Store::open(&config.store_path())?;
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            Duration::hours(config.token_ttl_hours),
        );
        Ok(Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
            passwords: Arc::new(PasswordHasher::new()),
        })
    }

    /// State backed by a temporary store, for tests.
    #[cfg(test)]
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(&dir.path().join("store.redb")).expect("Failed to open store");
        let state = Self {
            store: Arc::new(store),
            tokens: Arc::new(TokenService::new(b"test-secret", Duration::hours(24))),
            passwords: Arc::new(PasswordHasher::new()),
        };
        (state, dir)
    }
}
