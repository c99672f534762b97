// ABOUTME: Connection status and disconnect endpoints
// ABOUTME: Disconnect revokes provider access best-effort, then deletes the stored connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Connection management routes
pub struct ConnectionRoutes;

impl ConnectionRoutes {
    /// Create all connection routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/:user_id/connection",
                get(Self::handle_status).delete(Self::handle_disconnect),
            )
            .with_state(resources)
    }

    /// Report whether the user has a Strava connection and its sync state,
    /// enriched with the live athlete profile and all-time totals when the
    /// provider is reachable.
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<Value>> {
        let Some(connection) = resources.database.get_connection(user_id).await? else {
            return Ok(Json(json!({ "connected": false })));
        };

        let mut body = json!({
            "connected": true,
            "athlete_id": connection.athlete_id,
            "connected_at": connection.connected_at,
            "last_sync_at": connection.last_sync_at,
            "token_expires_at": connection.expires_at,
        });

        // Enrichment is best-effort: a provider outage must not turn a
        // status read into an error.
        if let Ok(Some(token)) = resources.sync.tokens().get_valid_token(user_id).await {
            match resources.strava.get_athlete(&token).await {
                Ok(profile) => {
                    body["athlete_name"] =
                        json!(format!("{} {}", profile.firstname, profile.lastname));
                    body["athlete_profile"] = json!(profile.profile);
                }
                Err(e) => warn!(%user_id, error = %e, "Athlete profile lookup failed"),
            }

            match resources
                .strava
                .get_athlete_stats(&token, connection.athlete_id)
                .await
            {
                Ok(stats) => body["all_time_totals"] = json!(stats),
                Err(e) => warn!(%user_id, error = %e, "Athlete stats lookup failed"),
            }
        }

        Ok(Json(body))
    }

    /// Remove the user's Strava connection.
    async fn handle_disconnect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<Value>> {
        let connection = resources
            .database
            .get_connection(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No Strava connection for user {user_id}"))
            })?;

        // Revocation is best-effort: an already-revoked or expired token must
        // not block the local delete.
        if let Err(e) = resources.strava.deauthorize(&connection.access_token).await {
            warn!(%user_id, error = %e, "Provider deauthorize failed, deleting connection anyway");
        }

        resources.database.delete_connection(user_id).await?;
        info!(%user_id, "Strava connection removed");

        Ok(Json(json!({ "status": "disconnected" })))
    }
}
