// ABOUTME: Fitness provider abstraction: the StravaApi trait and shared token/athlete types
// ABOUTME: The trait is the seam that lets the sync engine run against test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Fitness data provider system.
//!
//! All outbound provider traffic goes through the [`StravaApi`] trait so the
//! token store and sync engine never depend on a live HTTP client. Error
//! mapping follows the provider taxonomy: 401 is `ProviderUnauthorized`,
//! rate limits and server errors are `ProviderTransient`, and undecodable
//! bodies are `ProviderMalformed`.

/// Strava HTTP client implementation
pub mod strava;

pub use strava::StravaClient;

use crate::errors::AppResult;
use crate::models::RawActivity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair returned by the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// New access token
    pub access_token: String,
    /// New refresh token (Strava rotates these on every refresh)
    pub refresh_token: String,
    /// Expiry as a Unix timestamp
    pub expires_at: i64,
}

impl TokenResponse {
    /// Expiry as a UTC timestamp, falling back to a 6-hour lifetime when the
    /// provider sends an out-of-range value.
    #[must_use]
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at, 0)
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(6))
    }
}

/// Athlete profile summary from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Provider-side athlete id
    pub id: i64,
    /// First name
    #[serde(default)]
    pub firstname: String,
    /// Last name
    #[serde(default)]
    pub lastname: String,
    /// Profile picture URL
    #[serde(default)]
    pub profile: Option<String>,
}

/// Token exchange response: tokens plus the authenticating athlete.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    /// New access token
    pub access_token: String,
    /// New refresh token
    pub refresh_token: String,
    /// Expiry as a Unix timestamp
    pub expires_at: i64,
    /// Granted scope, when echoed back
    #[serde(default)]
    pub scope: Option<String>,
    /// The athlete who authorized the application
    pub athlete: AthleteProfile,
}

/// Aggregate athlete statistics from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteStats {
    /// All-time run totals
    #[serde(default)]
    pub all_run_totals: StatsTotals,
    /// All-time ride totals
    #[serde(default)]
    pub all_ride_totals: StatsTotals,
    /// All-time swim totals
    #[serde(default)]
    pub all_swim_totals: StatsTotals,
}

/// One bucket of aggregate statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsTotals {
    /// Activity count
    #[serde(default)]
    pub count: i64,
    /// Total distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Total moving time in seconds
    #[serde(default)]
    pub moving_time: i64,
}

/// Outbound provider operations used by the OAuth flow and the sync engine.
#[async_trait::async_trait]
pub trait StravaApi: Send + Sync {
    /// Exchange an authorization code for a token pair and athlete profile.
    async fn exchange_code(&self, code: &str) -> AppResult<TokenExchangeResponse>;

    /// Exchange a refresh token for a new access/refresh pair.
    async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Revoke the application's access for this token.
    async fn deauthorize(&self, access_token: &str) -> AppResult<()>;

    /// List activities started after `after` (Unix timestamp), one page.
    ///
    /// Safe to re-invoke with the same `after`: the provider-side listing is
    /// idempotent, restartability comes for free.
    async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<Vec<RawActivity>>;

    /// Fetch one activity by its provider-side id.
    async fn get_activity(&self, access_token: &str, activity_id: i64) -> AppResult<RawActivity>;

    /// Fetch the authenticated athlete's profile.
    async fn get_athlete(&self, access_token: &str) -> AppResult<AthleteProfile>;

    /// Fetch aggregate statistics for an athlete.
    async fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: i64,
    ) -> AppResult<AthleteStats>;
}
