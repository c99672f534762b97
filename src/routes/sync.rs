// ABOUTME: Manual sync trigger endpoint
// ABOUTME: Runs a full sync inline and reports the outcome to the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::errors::AppResult;
use crate::resources::ServerResources;
use crate::sync::SyncOutcome;
use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Manual sync routes
pub struct SyncRoutes;

impl SyncRoutes {
    /// Create all sync routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/:user_id/sync", post(Self::handle_sync))
            .with_state(resources)
    }

    /// Run a sync for the user and report the outcome.
    ///
    /// A disconnected user is a normal outcome, not an error: the response
    /// is 200 with `status: "disconnected"` so clients can prompt for
    /// reconnection.
    async fn handle_sync(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<SyncOutcome>> {
        info!(%user_id, "Manual sync requested");
        let outcome = resources.sync.sync_user(user_id).await?;
        Ok(Json(outcome))
    }
}
