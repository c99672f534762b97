// ABOUTME: Sync engine: fetch, classify, score, de-duplicate, and persist Strava activities
// ABOUTME: Per-user full sync plus the single-activity path used by webhook events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::database::Database;
use crate::errors::AppResult;
use crate::gamification::{classify, compute_points, estimate_calories};
use crate::models::{Activity, ActivitySource, RawActivity};
use crate::providers::StravaApi;
use crate::sync::TokenStore;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one sync invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Sync ran to completion.
    Completed {
        /// Number of newly persisted activities
        new_activities: u32,
    },
    /// The user has no usable connection; nothing was synced.
    Disconnected,
}

/// Orchestrates activity synchronization for individual users.
#[derive(Clone)]
pub struct SyncEngine {
    db: Database,
    api: Arc<dyn StravaApi>,
    tokens: TokenStore,
    lookback_days: i64,
    page_limit: u32,
    per_page: u32,
}

impl SyncEngine {
    /// Create a sync engine.
    pub fn new(
        db: Database,
        api: Arc<dyn StravaApi>,
        lookback_days: i64,
        page_limit: u32,
        per_page: u32,
    ) -> Self {
        let tokens = TokenStore::new(db.clone(), api.clone());
        Self {
            db,
            api,
            tokens,
            lookback_days,
            page_limit,
            per_page,
        }
    }

    /// The token store backing this engine.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sync all recent activities for a user.
    ///
    /// Fetches pages since the last successful sync (or the configured
    /// lookback window on first sync), classifies and scores each new
    /// activity, and persists it. Safe to re-run: already-recorded external
    /// activities are skipped. Partial progress survives a mid-batch
    /// failure; the re-run picks up the remainder.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, a transient provider failure,
    /// or a malformed provider response. A missing or revoked connection is
    /// not an error; it yields [`SyncOutcome::Disconnected`].
    pub async fn sync_user(&self, user_id: Uuid) -> AppResult<SyncOutcome> {
        let Some(connection) = self.db.get_connection(user_id).await? else {
            return Ok(SyncOutcome::Disconnected);
        };

        let Some(token) = self.tokens.get_valid_token(user_id).await? else {
            return Ok(SyncOutcome::Disconnected);
        };

        let since = connection
            .last_sync_at
            .unwrap_or_else(|| Utc::now() - Duration::days(self.lookback_days))
            .timestamp();

        let raw_activities = match self.fetch_all(&token, since).await {
            Ok(batch) => batch,
            Err(e) if e.is_provider_unauthorized() => {
                // The stored expiry lied. Refresh once and retry; a second
                // rejection means the user revoked access.
                warn!(%user_id, "Token rejected mid-sync, forcing refresh");
                let Some(token) = self.tokens.force_refresh(user_id).await? else {
                    return Ok(SyncOutcome::Disconnected);
                };
                match self.fetch_all(&token, since).await {
                    Ok(batch) => batch,
                    Err(e) if e.is_provider_unauthorized() => {
                        warn!(%user_id, "Refreshed token also rejected, treating as disconnected");
                        return Ok(SyncOutcome::Disconnected);
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        let new_activities = self.reconcile_and_persist(user_id, &raw_activities).await?;

        self.db.update_last_sync(user_id, Utc::now()).await?;
        info!(%user_id, new_activities, fetched = raw_activities.len(), "Sync completed");

        Ok(SyncOutcome::Completed { new_activities })
    }

    /// Sync one specific activity, as referenced by a webhook event.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::sync_user`].
    pub async fn sync_single_activity(
        &self,
        user_id: Uuid,
        external_id: i64,
    ) -> AppResult<SyncOutcome> {
        let Some(token) = self.tokens.get_valid_token(user_id).await? else {
            return Ok(SyncOutcome::Disconnected);
        };

        let raw = match self.api.get_activity(&token, external_id).await {
            Ok(raw) => raw,
            Err(e) if e.is_provider_unauthorized() => {
                let Some(token) = self.tokens.force_refresh(user_id).await? else {
                    return Ok(SyncOutcome::Disconnected);
                };
                match self.api.get_activity(&token, external_id).await {
                    Ok(raw) => raw,
                    Err(e) if e.is_provider_unauthorized() => {
                        return Ok(SyncOutcome::Disconnected)
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        let new_activities = self
            .reconcile_and_persist(user_id, std::slice::from_ref(&raw))
            .await?;

        Ok(SyncOutcome::Completed { new_activities })
    }

    /// Fetch pages of activities until a short page or the page limit.
    async fn fetch_all(&self, token: &str, since: i64) -> AppResult<Vec<RawActivity>> {
        let mut all = Vec::new();

        for page in 1..=self.page_limit {
            let batch = self
                .api
                .list_activities(token, since, page, self.per_page)
                .await?;
            let batch_len = batch.len();
            all.extend(batch);

            if batch_len < self.per_page as usize {
                break;
            }
            if page == self.page_limit {
                warn!(since, page, "Hit sync page limit, remaining activities deferred to next sync");
            }
        }

        Ok(all)
    }

    /// Classify, score, and persist each raw activity not already recorded.
    async fn reconcile_and_persist(
        &self,
        user_id: Uuid,
        raw_activities: &[RawActivity],
    ) -> AppResult<u32> {
        let mut new_activities = 0_u32;

        for raw in raw_activities {
            if self
                .db
                .external_activity_exists(user_id, raw.external_id)
                .await?
            {
                debug!(%user_id, external_id = raw.external_id, "Activity already recorded, skipping");
                continue;
            }

            let activity = build_activity(user_id, raw);
            // False means the unique index caught a concurrent insert of the
            // same activity. Same outcome as the pre-insert lookup: skip.
            if self.db.insert_activity(&activity).await? {
                debug!(
                    %user_id,
                    external_id = raw.external_id,
                    category = %activity.category,
                    points = activity.points,
                    "Persisted new activity"
                );
                new_activities += 1;
            }
        }

        Ok(new_activities)
    }

    /// Resolve a Strava athlete id to a user and sync the given activity.
    ///
    /// Returns `None` when no user has a connection for that athlete. Keeps
    /// the "resolve athlete, then sync one activity" composition out of the
    /// webhook route handler.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::sync_user`].
    pub async fn sync_webhook_activity(
        &self,
        athlete_id: i64,
        external_id: i64,
    ) -> AppResult<Option<SyncOutcome>> {
        let Some(connection) = self.db.get_connection_by_athlete(athlete_id).await? else {
            return Ok(None);
        };

        let outcome = self
            .sync_single_activity(connection.user_id, external_id)
            .await?;
        Ok(Some(outcome))
    }
}

/// Classify and score one raw activity into a persistable record.
fn build_activity(user_id: Uuid, raw: &RawActivity) -> Activity {
    let category = classify(raw);
    let duration_minutes = raw.duration_minutes();
    let distance_km = raw.distance_km();
    let points = compute_points(category, duration_minutes, distance_km, raw.average_heartrate);
    let calories = estimate_calories(category, duration_minutes, raw.average_heartrate);

    Activity {
        id: Uuid::new_v4().to_string(),
        user_id,
        external_id: Some(raw.external_id),
        category,
        start_date: raw.start_date,
        duration_minutes,
        distance_km,
        calories,
        average_heartrate: raw.average_heartrate,
        points,
        source: ActivitySource::Strava,
        notes: if raw.name.is_empty() {
            None
        } else {
            Some(raw.name.clone())
        },
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("lookback_days", &self.lookback_days)
            .field("page_limit", &self.page_limit)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}
