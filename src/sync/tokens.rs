// ABOUTME: Token store: hands out live access tokens, refreshing near-expiry ones first
// ABOUTME: Absent connection or rejected refresh surfaces as None, meaning disconnected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::StravaConnection;
use crate::providers::StravaApi;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Refresh this long before the stored expiry so a token never dies mid-sync.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// Hands out valid access tokens, refreshing stored ones as needed.
#[derive(Clone)]
pub struct TokenStore {
    db: Database,
    api: Arc<dyn StravaApi>,
}

impl TokenStore {
    /// Create a token store over the given database and provider client.
    pub fn new(db: Database, api: Arc<dyn StravaApi>) -> Self {
        Self { db, api }
    }

    /// Get a valid access token for a user.
    ///
    /// Returns `None` when the user has no connection or the provider
    /// rejected the refresh token. Callers must treat `None` as
    /// "disconnected", not as a retryable condition.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or a transient provider failure
    /// during refresh. A rejected refresh is not an error.
    pub async fn get_valid_token(&self, user_id: Uuid) -> AppResult<Option<String>> {
        let Some(connection) = self.db.get_connection(user_id).await? else {
            debug!(%user_id, "No Strava connection");
            return Ok(None);
        };

        let refresh_deadline = Utc::now() + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
        if connection.expires_at > refresh_deadline {
            return Ok(Some(connection.access_token));
        }

        debug!(%user_id, expires_at = %connection.expires_at, "Access token near expiry, refreshing");
        self.refresh(&connection).await
    }

    /// Refresh a user's token pair regardless of stored expiry.
    ///
    /// Used after the provider rejects a token the store believed was still
    /// valid (expiry drift, revocation races).
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or a transient provider failure.
    pub async fn force_refresh(&self, user_id: Uuid) -> AppResult<Option<String>> {
        let Some(connection) = self.db.get_connection(user_id).await? else {
            return Ok(None);
        };
        self.refresh(&connection).await
    }

    async fn refresh(&self, connection: &StravaConnection) -> AppResult<Option<String>> {
        let response = match self.api.refresh_token(&connection.refresh_token).await {
            Ok(response) => response,
            Err(e) if e.is_provider_unauthorized() => {
                warn!(user_id = %connection.user_id, error = %e, "Refresh token rejected, treating user as disconnected");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let expires_at = response.expires_at_utc();
        self.db
            .update_connection_tokens(
                connection.user_id,
                &response.access_token,
                &response.refresh_token,
                expires_at,
            )
            .await?;

        info!(user_id = %connection.user_id, %expires_at, "Refreshed Strava access token");
        Ok(Some(response.access_token))
    }
}
