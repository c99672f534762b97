// ABOUTME: Strava OAuth connect flow: authorization URL issuance and callback handling
// ABOUTME: Random state parameters are held in memory with a short expiry window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::errors::{AppError, AppResult};
use crate::models::StravaConnection;
use crate::resources::{PendingAuth, ServerResources};
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const STRAVA_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";
const OAUTH_SCOPE: &str = "read,activity:read_all";

/// States older than this are rejected at callback time.
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Deserialize)]
struct AuthUrlParams {
    user_id: Uuid,
}

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// OAuth connect flow routes
pub struct OAuthRoutes;

impl OAuthRoutes {
    /// Create all OAuth routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/strava/auth-url", get(Self::handle_auth_url))
            .route("/api/strava/callback", get(Self::handle_callback))
            .with_state(resources)
    }

    /// Issue the provider authorization URL for a user.
    async fn handle_auth_url(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<AuthUrlParams>,
    ) -> AppResult<Json<Value>> {
        let state = random_state();
        prune_expired_states(&resources);
        resources.oauth_states.insert(
            state.clone(),
            PendingAuth {
                user_id: params.user_id,
                created_at: Utc::now(),
            },
        );

        let url = format!(
            "{STRAVA_AUTHORIZE_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={state}",
            urlencoding::encode(&resources.config.strava_client_id),
            urlencoding::encode(&resources.config.strava_redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
        );

        Ok(Json(json!({ "authorization_url": url, "state": state })))
    }

    /// Handle the provider's redirect back to us.
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<CallbackParams>,
    ) -> AppResult<Json<Value>> {
        if let Some(error) = params.error {
            warn!(%error, "Strava authorization denied");
            return Err(AppError::invalid_input(format!(
                "Authorization denied: {error}"
            )));
        }

        let code = params
            .code
            .ok_or_else(|| AppError::invalid_input("Missing authorization code"))?;
        let state = params
            .state
            .ok_or_else(|| AppError::invalid_input("Missing state parameter"))?;

        let (_, pending) = resources
            .oauth_states
            .remove(&state)
            .ok_or_else(|| AppError::invalid_input("Unknown or already-used state parameter"))?;

        if Utc::now() - pending.created_at > Duration::minutes(STATE_TTL_MINUTES) {
            return Err(AppError::invalid_input("State parameter expired"));
        }

        let exchange = resources.strava.exchange_code(&code).await?;
        let expires_at = chrono::DateTime::from_timestamp(exchange.expires_at, 0)
            .unwrap_or_else(|| Utc::now() + Duration::hours(6));

        let connection = StravaConnection {
            user_id: pending.user_id,
            athlete_id: exchange.athlete.id,
            access_token: exchange.access_token,
            refresh_token: exchange.refresh_token,
            expires_at,
            scope: exchange.scope,
            connected_at: Utc::now(),
            last_sync_at: None,
        };
        resources.database.upsert_connection(&connection).await?;

        info!(user_id = %pending.user_id, athlete_id = exchange.athlete.id, "Strava connection established");

        Ok(Json(json!({
            "status": "connected",
            "athlete_id": exchange.athlete.id,
            "athlete_name": format!("{} {}", exchange.athlete.firstname, exchange.athlete.lastname),
        })))
    }
}

/// 32 hex chars of CSRF state.
fn random_state() -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Drop states past their TTL so abandoned flows don't accumulate.
fn prune_expired_states(resources: &ServerResources) {
    let cutoff = Utc::now() - Duration::minutes(STATE_TTL_MINUTES);
    resources
        .oauth_states
        .retain(|_, pending| pending.created_at > cutoff);
}
