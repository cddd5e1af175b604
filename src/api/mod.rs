// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP API surface.
//!
//! Route composition: `/login` and `/health` are public; everything else
//! sits behind the authentication middleware. The admin reporting routes
//! add the master-admin role gate, and the per-college routes add the
//! tenant gate.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::middleware::{authenticate, authorize, college_access, MASTER_ADMIN_ONLY};
use crate::state::AppState;

pub mod admin;
pub mod colleges;
pub mod health;
pub mod session;

pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/colleges", get(admin::list_colleges))
        .route("/admin/stats", get(admin::stats))
        .layer(middleware::from_fn(move |request, next| {
            authorize(MASTER_ADMIN_ONLY, request, next)
        }));

    let college_routes = Router::new()
        .route("/colleges/{college_id}", get(colleges::get_college))
        .layer(middleware::from_fn(college_access));

    let protected_routes = Router::new()
        .route("/me", get(session::current_user))
        .route("/change-password", post(session::change_password))
        .merge(admin_routes)
        .merge(college_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/login", post(session::login))
        .route("/health", get(health::health))
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Best-effort college display name resolution.
///
/// Shared by the session and admin endpoints; a failed lookup degrades
/// to `None` and never fails the surrounding request.
pub(crate) fn college_display_name(state: &AppState, college_id: Option<&str>) -> Option<String> {
    let college_id = college_id?;
    match state.store.college(college_id) {
        Ok(Some(college)) => Some(college.name),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(college_id = %college_id, error = %e, "failed to fetch college name");
            None
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::login,
        session::current_user,
        session::change_password,
        colleges::get_college,
        admin::list_colleges,
        admin::stats,
        health::health
    ),
    components(
        schemas(
            crate::auth::Role,
            session::LoginRequest,
            session::LoginResponse,
            session::ChangePasswordRequest,
            session::UserProfile,
            session::MessageResponse,
            colleges::CollegeProfile,
            admin::AdminInfo,
            admin::CollegeSummary,
            admin::RecentLogin,
            admin::StatsResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Session", description = "Login and account management"),
        (name = "Colleges", description = "College-scoped data"),
        (name = "Admin", description = "Cross-college reporting (master_admin)"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;
