// ABOUTME: Database operations for Strava connections (per-user OAuth credential state)
// ABOUTME: CRUD plus token-refresh and last-sync mutations on the strava_connections table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::StravaConnection;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Register a Strava connection (upsert).
    ///
    /// Creates or replaces the single `strava_connections` row for the user.
    /// Re-connecting overwrites tokens and resets `connected_at`; the
    /// last-sync timestamp is preserved via `excluded` semantics only when
    /// the caller passes it through.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn upsert_connection(&self, connection: &StravaConnection) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO strava_connections (
                user_id, athlete_id, access_token, refresh_token,
                expires_at, scope, connected_at, last_sync_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                athlete_id = excluded.athlete_id,
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at,
                scope = excluded.scope,
                connected_at = excluded.connected_at,
                last_sync_at = excluded.last_sync_at
            ",
        )
        .bind(connection.user_id.to_string())
        .bind(connection.athlete_id)
        .bind(&connection.access_token)
        .bind(&connection.refresh_token)
        .bind(connection.expires_at)
        .bind(connection.scope.as_deref())
        .bind(connection.connected_at)
        .bind(connection.last_sync_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert Strava connection: {e}")))?;

        Ok(())
    }

    /// Get the Strava connection for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_connection(&self, user_id: Uuid) -> AppResult<Option<StravaConnection>> {
        let row = sqlx::query(
            r"
            SELECT user_id, athlete_id, access_token, refresh_token,
                   expires_at, scope, connected_at, last_sync_at
            FROM strava_connections
            WHERE user_id = ?
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query Strava connection: {e}")))?;

        row.map(|r| row_to_connection(&r)).transpose()
    }

    /// Resolve a Strava athlete id to its connection, if any.
    ///
    /// Used by the webhook receiver to map event owners to internal users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_connection_by_athlete(
        &self,
        athlete_id: i64,
    ) -> AppResult<Option<StravaConnection>> {
        let row = sqlx::query(
            r"
            SELECT user_id, athlete_id, access_token, refresh_token,
                   expires_at, scope, connected_at, last_sync_at
            FROM strava_connections
            WHERE athlete_id = ?
            ",
        )
        .bind(athlete_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to query connection by athlete: {e}")))?;

        row.map(|r| row_to_connection(&r)).transpose()
    }

    /// Persist a refreshed access/refresh token pair and its new expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_connection_tokens(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE strava_connections
            SET access_token = ?, refresh_token = ?, expires_at = ?
            WHERE user_id = ?
            ",
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(user_id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update connection tokens: {e}")))?;

        Ok(())
    }

    /// Record a successful sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_last_sync(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE strava_connections SET last_sync_at = ? WHERE user_id = ?")
            .bind(at)
            .bind(user_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update last sync: {e}")))?;

        Ok(())
    }

    /// Remove a Strava connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_connection(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM strava_connections WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete Strava connection: {e}")))?;

        Ok(())
    }
}

/// Convert a database row to a `StravaConnection`.
fn row_to_connection(row: &SqliteRow) -> AppResult<StravaConnection> {
    let user_id_str: String = row.get("user_id");
    let user_id = Uuid::parse_str(&user_id_str)?;

    Ok(StravaConnection {
        user_id,
        athlete_id: row.get("athlete_id"),
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        expires_at: row.get("expires_at"),
        scope: row.get("scope"),
        connected_at: row.get("connected_at"),
        last_sync_at: row.get("last_sync_at"),
    })
}
