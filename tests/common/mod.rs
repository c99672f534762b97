// ABOUTME: Shared test helpers: in-memory database, connection fixtures, and a provider stub
// ABOUTME: StubStrava implements the provider trait with canned data and call counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

#![allow(dead_code)]

use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use stridesync::config::ServerConfig;
use stridesync::database::Database;
use stridesync::errors::{AppError, AppResult};
use stridesync::models::{RawActivity, StravaConnection};
use stridesync::providers::{
    AthleteProfile, AthleteStats, StravaApi, TokenExchangeResponse, TokenResponse,
};
use stridesync::resources::ServerResources;
use uuid::Uuid;

pub const TEST_ATHLETE_ID: i64 = 777;

pub async fn test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// A valid connection expiring an hour from now.
pub fn test_connection(user_id: Uuid) -> StravaConnection {
    StravaConnection {
        user_id,
        athlete_id: TEST_ATHLETE_ID,
        access_token: "initial_access".to_owned(),
        refresh_token: "initial_refresh".to_owned(),
        expires_at: Utc::now() + Duration::hours(1),
        scope: Some("read,activity:read_all".to_owned()),
        connected_at: Utc::now() - Duration::days(7),
        last_sync_at: None,
    }
}

/// Same connection but with an already-expired access token.
pub fn expired_connection(user_id: Uuid) -> StravaConnection {
    StravaConnection {
        expires_at: Utc::now() - Duration::hours(1),
        ..test_connection(user_id)
    }
}

pub fn raw_activity(external_id: i64, sport_type: &str, name: &str) -> RawActivity {
    RawActivity {
        external_id,
        sport_type: sport_type.to_owned(),
        name: name.to_owned(),
        duration_seconds: 30 * 60,
        distance_meters: 5000.0,
        average_heartrate: Some(140.0),
        start_date: Utc::now() - Duration::hours(2),
    }
}

/// In-memory provider double with canned activities and call counters.
#[derive(Default)]
pub struct StubStrava {
    pub activities: Vec<RawActivity>,
    /// Reject every refresh attempt (revoked refresh token).
    pub reject_refresh: bool,
    /// Reject the first activity fetch with an unauthorized error.
    pub fail_first_fetch: AtomicBool,
    pub fetch_calls: AtomicU32,
    pub refresh_calls: AtomicU32,
}

impl StubStrava {
    pub fn with_activities(activities: Vec<RawActivity>) -> Self {
        Self {
            activities,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl StravaApi for StubStrava {
    async fn exchange_code(&self, _code: &str) -> AppResult<TokenExchangeResponse> {
        Ok(TokenExchangeResponse {
            access_token: "exchanged_access".to_owned(),
            refresh_token: "exchanged_refresh".to_owned(),
            expires_at: (Utc::now() + Duration::hours(6)).timestamp(),
            scope: Some("read,activity:read_all".to_owned()),
            athlete: AthleteProfile {
                id: TEST_ATHLETE_ID,
                firstname: "Test".to_owned(),
                lastname: "Athlete".to_owned(),
                profile: None,
            },
        })
    }

    async fn refresh_token(&self, _refresh_token: &str) -> AppResult<TokenResponse> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_refresh {
            return Err(AppError::provider_unauthorized("refresh rejected"));
        }
        Ok(TokenResponse {
            access_token: "refreshed_access".to_owned(),
            refresh_token: "refreshed_refresh".to_owned(),
            expires_at: (Utc::now() + Duration::hours(6)).timestamp(),
        })
    }

    async fn deauthorize(&self, _access_token: &str) -> AppResult<()> {
        Ok(())
    }

    async fn list_activities(
        &self,
        _access_token: &str,
        _after: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<Vec<RawActivity>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_first_fetch.swap(false, Ordering::SeqCst) {
            return Err(AppError::provider_unauthorized("token rejected"));
        }

        let start = ((page - 1) * per_page) as usize;
        let end = (start + per_page as usize).min(self.activities.len());
        if start >= self.activities.len() {
            return Ok(Vec::new());
        }
        Ok(self.activities[start..end].to_vec())
    }

    async fn get_activity(&self, _access_token: &str, activity_id: i64) -> AppResult<RawActivity> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.activities
            .iter()
            .find(|a| a.external_id == activity_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Activity {activity_id}")))
    }

    async fn get_athlete(&self, _access_token: &str) -> AppResult<AthleteProfile> {
        Ok(AthleteProfile {
            id: TEST_ATHLETE_ID,
            firstname: "Test".to_owned(),
            lastname: "Athlete".to_owned(),
            profile: None,
        })
    }

    async fn get_athlete_stats(
        &self,
        _access_token: &str,
        _athlete_id: i64,
    ) -> AppResult<AthleteStats> {
        Ok(AthleteStats {
            all_run_totals: stridesync::providers::StatsTotals::default(),
            all_ride_totals: stridesync::providers::StatsTotals::default(),
            all_swim_totals: stridesync::providers::StatsTotals::default(),
        })
    }
}

/// Full resource set over an in-memory database and the given stub.
pub async fn test_resources(stub: Arc<StubStrava>) -> Arc<ServerResources> {
    let database = test_database().await;
    Arc::new(ServerResources::new(
        ServerConfig::default(),
        database,
        stub,
    ))
}
