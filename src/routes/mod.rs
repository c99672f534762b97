// ABOUTME: HTTP route handlers grouped by concern, plus top-level router assembly
// ABOUTME: Each module exposes a Routes struct whose routes() builds its own router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! HTTP API surface.

/// Activity listing and points summary
pub mod activities;
/// Connection status and disconnect
pub mod connection;
/// Liveness probe
pub mod health;
/// Strava OAuth connect flow
pub mod oauth;
/// Manual sync trigger
pub mod sync;
/// Strava webhook verification and event delivery
pub mod webhook;

use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router.
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(oauth::OAuthRoutes::routes(resources.clone()))
        .merge(connection::ConnectionRoutes::routes(resources.clone()))
        .merge(sync::SyncRoutes::routes(resources.clone()))
        .merge(activities::ActivityRoutes::routes(resources.clone()))
        .merge(webhook::WebhookRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
