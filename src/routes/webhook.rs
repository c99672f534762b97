// ABOUTME: Strava webhook endpoints: subscription verification and event delivery
// ABOUTME: Event delivery always returns 200 to honor the provider's delivery contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::resources::ServerResources;
use crate::sync::SyncOutcome;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Strava's subscription verification query parameters.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: String,
    #[serde(rename = "hub.challenge")]
    challenge: String,
    #[serde(rename = "hub.verify_token")]
    verify_token: String,
}

/// An inbound webhook event.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    object_type: String,
    object_id: i64,
    aspect_type: String,
    owner_id: i64,
}

/// Webhook routes
pub struct WebhookRoutes;

impl WebhookRoutes {
    /// Create all webhook routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/webhook/strava",
                get(Self::handle_verify).post(Self::handle_event),
            )
            .with_state(resources)
    }

    /// Subscription verification handshake.
    ///
    /// Echo the challenge only when the shared verification token matches;
    /// anything else is a 403.
    async fn handle_verify(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<VerifyParams>,
    ) -> Response {
        if params.mode == "subscribe"
            && params.verify_token == resources.config.webhook_verify_token
        {
            info!("Webhook subscription verified");
            return (
                StatusCode::OK,
                Json(json!({ "hub.challenge": params.challenge })),
            )
                .into_response();
        }

        warn!(mode = %params.mode, "Webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }

    /// Event delivery.
    ///
    /// Always acknowledges with 200, whatever happens internally, so the
    /// provider never retry-storms us. Failures are logged instead. The body
    /// is taken raw and parsed by hand: an extractor rejection would answer
    /// 4xx and break the acknowledgement contract.
    async fn handle_event(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> StatusCode {
        let event: WebhookEvent = match serde_json::from_slice(&body) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Undecodable webhook event body, acknowledging anyway");
                return StatusCode::OK;
            }
        };

        info!(
            object_type = %event.object_type,
            aspect_type = %event.aspect_type,
            object_id = event.object_id,
            owner_id = event.owner_id,
            "Webhook event received"
        );

        if event.object_type != "activity" || event.aspect_type != "create" {
            return StatusCode::OK;
        }

        match resources
            .sync
            .sync_webhook_activity(event.owner_id, event.object_id)
            .await
        {
            Ok(Some(SyncOutcome::Completed { new_activities })) => {
                info!(object_id = event.object_id, new_activities, "Webhook sync completed");
            }
            Ok(Some(SyncOutcome::Disconnected)) => {
                warn!(owner_id = event.owner_id, "Webhook event for a disconnected user");
            }
            Ok(None) => {
                warn!(owner_id = event.owner_id, "Webhook event for unknown athlete, ignoring");
            }
            Err(e) => {
                error!(object_id = event.object_id, error = %e, "Webhook sync failed");
            }
        }

        StatusCode::OK
    }
}
