// ABOUTME: Liveness probe endpoint
// ABOUTME: Returns service name and version; no dependencies are touched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health routes
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
