// ABOUTME: Strava API client: OAuth token endpoints and activity/athlete data retrieval
// ABOUTME: Maps HTTP failures onto the provider error taxonomy (401 vs 429/5xx vs decode)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::errors::{AppError, AppResult};
use crate::models::RawActivity;
use crate::providers::{
    AthleteProfile, AthleteStats, StravaApi, TokenExchangeResponse, TokenResponse,
};
use serde::de::DeserializeOwned;
use tracing::warn;

const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const STRAVA_DEAUTHORIZE_URL: &str = "https://www.strava.com/oauth/deauthorize";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    deauthorize_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: STRAVA_API_BASE.to_owned(),
            token_url: STRAVA_TOKEN_URL.to_owned(),
            deauthorize_url: STRAVA_DEAUTHORIZE_URL.to_owned(),
            client_id,
            client_secret,
        }
    }

    /// Override the API endpoints (local mock servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.token_url = format!("{base_url}/oauth/token");
        self.deauthorize_url = format!("{base_url}/oauth/deauthorize");
        self.base_url = base_url;
        self
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, access_token: &str) -> AppResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::provider_transient(format!("Request failed: {e}")))?;

        check_response_json(response).await
    }
}

/// Map a non-success status onto the provider error taxonomy.
async fn status_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 | 403 => AppError::provider_unauthorized(format!("HTTP {status}: {body}")),
        404 => AppError::not_found("Strava resource not found"),
        429 => {
            warn!("Strava rate limit hit (429)");
            AppError::provider_transient("Rate limited by Strava")
        }
        _ => AppError::provider_transient(format!("HTTP {status}: {body}")),
    }
}

/// Check response status and decode the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| AppError::provider_malformed(format!("JSON decode error: {e}")))
}

#[async_trait::async_trait]
impl StravaApi for StravaClient {
    async fn exchange_code(&self, code: &str) -> AppResult<TokenExchangeResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::provider_transient(format!("Token exchange failed: {e}")))?;

        check_response_json(response).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::provider_transient(format!("Token refresh failed: {e}")))?;

        // Strava answers a revoked refresh token with 400/invalid_grant, not 401.
        if response.status().as_u16() == 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::provider_unauthorized(format!(
                "Refresh rejected: {body}"
            )));
        }

        check_response_json(response).await
    }

    async fn deauthorize(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .http
            .post(&self.deauthorize_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::provider_transient(format!("Deauthorize failed: {e}")))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<Vec<RawActivity>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::provider_transient(format!("Activity list failed: {e}")))?;

        check_response_json(response).await
    }

    async fn get_activity(&self, access_token: &str, activity_id: i64) -> AppResult<RawActivity> {
        let url = format!("{}/activities/{activity_id}", self.base_url);
        self.get_json(&url, access_token).await
    }

    async fn get_athlete(&self, access_token: &str) -> AppResult<AthleteProfile> {
        let url = format!("{}/athlete", self.base_url);
        self.get_json(&url, access_token).await
    }

    async fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: i64,
    ) -> AppResult<AthleteStats> {
        let url = format!("{}/athletes/{athlete_id}/stats", self.base_url);
        self.get_json(&url, access_token).await
    }
}
