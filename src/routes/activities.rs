// ABOUTME: Activity listing and points summary endpoints
// ABOUTME: Read-only views over the persisted activity records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::errors::{AppError, AppResult};
use crate::models::{Activity, PointsSummary};
use crate::resources::ServerResources;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

#[derive(Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

/// Activity query routes
pub struct ActivityRoutes;

impl ActivityRoutes {
    /// Create all activity routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/:user_id/activities", get(Self::handle_list))
            .route(
                "/api/users/:user_id/points/summary",
                get(Self::handle_summary),
            )
            .with_state(resources)
    }

    /// List a user's activities, most recent first.
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<Uuid>,
        Query(params): Query<ListParams>,
    ) -> AppResult<Json<Vec<Activity>>> {
        let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit < 1 || limit > MAX_LIST_LIMIT {
            return Err(AppError::invalid_input(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}"
            )));
        }

        let activities = resources.database.list_activities(user_id, limit).await?;
        Ok(Json(activities))
    }

    /// Aggregate the user's points total and per-category breakdown.
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<PointsSummary>> {
        let summary = resources.database.points_summary(user_id).await?;
        Ok(Json(summary))
    }
}
