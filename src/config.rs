// ABOUTME: Environment-only server configuration loaded once at startup
// ABOUTME: Holds Strava OAuth credentials, webhook verification token, and sync tuning knobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Application configuration loaded from environment variables.
//!
//! Credentials and the webhook verification secret are injected here at
//! process start so handlers and services never read the environment ad hoc.

use crate::errors::AppError;
use std::env;

/// Default lookback window for a user's first sync.
const DEFAULT_FIRST_SYNC_LOOKBACK_DAYS: i64 = 30;

/// Default cap on paginated activity-list calls per sync invocation.
const DEFAULT_SYNC_PAGE_LIMIT: u32 = 5;

/// Default activities requested per page.
const DEFAULT_SYNC_PER_PAGE: u32 = 50;

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// `SQLite` database URL
    pub database_url: String,
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Redirect URI registered with the Strava application
    pub strava_redirect_uri: String,
    /// Shared secret echoed during the webhook verification handshake
    pub webhook_verify_token: String,
    /// Days of history fetched on a user's first sync
    pub first_sync_lookback_days: i64,
    /// Maximum activity-list pages fetched per sync invocation
    pub sync_page_limit: u32,
    /// Activities requested per page
    pub sync_per_page: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_owned())
                .parse()
                .map_err(|_| AppError::config("HTTP_PORT must be a valid port number"))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:stridesync.db".to_owned()),
            strava_client_id: require("STRAVA_CLIENT_ID")?,
            strava_client_secret: require("STRAVA_CLIENT_SECRET")?,
            strava_redirect_uri: env::var("STRAVA_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/api/strava/callback".to_owned()),
            webhook_verify_token: require("WEBHOOK_VERIFY_TOKEN")?,
            first_sync_lookback_days: parse_or(
                "FIRST_SYNC_LOOKBACK_DAYS",
                DEFAULT_FIRST_SYNC_LOOKBACK_DAYS,
            ),
            sync_page_limit: parse_or("SYNC_PAGE_LIMIT", DEFAULT_SYNC_PAGE_LIMIT),
            sync_per_page: parse_or("SYNC_PER_PAGE", DEFAULT_SYNC_PER_PAGE),
        })
    }
}

impl Default for ServerConfig {
    /// Default config for tests only.
    fn default() -> Self {
        Self {
            http_port: 8080,
            database_url: "sqlite::memory:".to_owned(),
            strava_client_id: "test_client_id".to_owned(),
            strava_client_secret: "test_client_secret".to_owned(),
            strava_redirect_uri: "http://localhost:8080/api/strava/callback".to_owned(),
            webhook_verify_token: "test_verify_token".to_owned(),
            first_sync_lookback_days: DEFAULT_FIRST_SYNC_LOOKBACK_DAYS,
            sync_page_limit: DEFAULT_SYNC_PAGE_LIMIT,
            sync_per_page: DEFAULT_SYNC_PER_PAGE,
        }
    }
}

fn require(name: &'static str) -> Result<String, AppError> {
    env::var(name)
        .map(|v| v.trim().to_owned())
        .map_err(|_| AppError::config(format!("Missing required environment variable: {name}")))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
