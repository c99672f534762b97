// ABOUTME: Shared server resources: config, database, provider client, sync engine, OAuth state
// ABOUTME: Constructed once at startup and passed as Arc to every route handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::config::ServerConfig;
use crate::database::Database;
use crate::providers::StravaApi;
use crate::sync::SyncEngine;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A pending OAuth authorization awaiting its callback.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    /// The user who initiated the flow
    pub user_id: Uuid,
    /// When the state was issued
    pub created_at: DateTime<Utc>,
}

/// Centralized server resources shared across all handlers.
pub struct ServerResources {
    /// Server configuration
    pub config: ServerConfig,
    /// Database handle
    pub database: Database,
    /// Provider client
    pub strava: Arc<dyn StravaApi>,
    /// Sync engine
    pub sync: SyncEngine,
    /// In-flight OAuth states, keyed by the random state parameter
    pub oauth_states: DashMap<String, PendingAuth>,
}

impl ServerResources {
    /// Assemble the shared resource set.
    #[must_use]
    pub fn new(config: ServerConfig, database: Database, strava: Arc<dyn StravaApi>) -> Self {
        let sync = SyncEngine::new(
            database.clone(),
            strava.clone(),
            config.first_sync_lookback_days,
            config.sync_page_limit,
            config.sync_per_page,
        );

        Self {
            config,
            database,
            strava,
            sync,
            oauth_states: DashMap::new(),
        }
    }
}
