// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use campus_server::api::router;
use campus_server::auth::Role;
use campus_server::config::AppConfig;
use campus_server::models::{normalize_email, User};
use campus_server::state::AppState;
use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to open store");
            std::process::exit(1);
        }
    };

    if let Err(e) = seed_admin(&state) {
        tracing::error!(error = %e, "failed to seed admin user");
        std::process::exit(1);
    }

    let app = router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "campus server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

/// Bootstrap master admin from `SEED_ADMIN_EMAIL`/`SEED_ADMIN_PASSWORD`.
///
/// No-op when the variables are unset or the account already exists, so
/// restarts are safe.
fn seed_admin(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(email), Ok(password)) = (
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let email = normalize_email(&email);
    if state.store.user_by_email(&email)?.is_some() {
        return Ok(());
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.clone(),
        password_hash: state.passwords.hash(&password)?,
        name: "Master Admin".to_string(),
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
    state.store.create_user(&user)?;
    tracing::info!(%email, "seeded master admin account");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
