// ABOUTME: Core database management with schema migration for SQLite
// ABOUTME: Handles connection pooling plus the strava_connections and activities tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Database layer.
//!
//! One `Database` handle wraps the `SQLite` pool; per-domain operations live
//! in their own modules as `impl Database` blocks.

/// Activity record storage and aggregation
pub mod activities;
/// Strava connection (OAuth credential state) storage
pub mod connections;

use crate::errors::{AppError, AppResult};
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

/// Database connection pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };

        db.migrate()
            .await
            .map_err(|e| AppError::database(format!("Database migration failed: {e}")))?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all database migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if any migration statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS strava_connections (
                user_id TEXT PRIMARY KEY,
                athlete_id INTEGER NOT NULL UNIQUE,
                access_token TEXT NOT NULL,
                refresh_token TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                scope TEXT,
                connected_at TEXT NOT NULL,
                last_sync_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activities (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                external_id INTEGER,
                category TEXT NOT NULL,
                start_date TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                distance_km REAL NOT NULL DEFAULT 0,
                calories INTEGER NOT NULL DEFAULT 0,
                average_heartrate REAL,
                points INTEGER NOT NULL DEFAULT 0,
                source TEXT NOT NULL,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Backstop for the application-level pre-insert lookup: concurrent
        // syncs for the same user may race on the same external activity.
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_activities_user_external
            ON activities (user_id, external_id)
            WHERE external_id IS NOT NULL
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_activities_user_date
            ON activities (user_id, start_date DESC)
            ",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations complete");
        Ok(())
    }
}
