// ABOUTME: Database operations for activity records: insert, lookup, listing, aggregation
// ABOUTME: Enforces the one-row-per-(user, external id) invariant via lookup plus unique index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, ActivitySource, Category, CategoryPoints, PointsSummary};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Insert a new activity record.
    ///
    /// Returns `false` when the (user, external id) unique index rejects the
    /// row — a concurrent sync already persisted it, which callers treat as a
    /// benign skip rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails for any other reason.
    pub async fn insert_activity(&self, activity: &Activity) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO activities (
                id, user_id, external_id, category, start_date, duration_minutes,
                distance_km, calories, average_heartrate, points, source, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&activity.id)
        .bind(activity.user_id.to_string())
        .bind(activity.external_id)
        .bind(activity.category.as_str())
        .bind(activity.start_date)
        .bind(activity.duration_minutes)
        .bind(activity.distance_km)
        .bind(activity.calories)
        .bind(activity.average_heartrate)
        .bind(activity.points)
        .bind(activity.source.as_str())
        .bind(activity.notes.as_deref())
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(e) => Err(AppError::database(format!(
                "Failed to insert activity: {e}"
            ))),
        }
    }

    /// Check whether an external activity is already recorded for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn external_activity_exists(
        &self,
        user_id: Uuid,
        external_id: i64,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities WHERE user_id = ? AND external_id = ?",
        )
        .bind(user_id.to_string())
        .bind(external_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to check activity existence: {e}")))?;

        Ok(count > 0)
    }

    /// List a user's activities, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_activities(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, external_id, category, start_date, duration_minutes,
                   distance_km, calories, average_heartrate, points, source, notes
            FROM activities
            WHERE user_id = ?
            ORDER BY start_date DESC
            LIMIT ?
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list activities: {e}")))?;

        rows.iter().map(row_to_activity).collect()
    }

    /// List externally-sourced activities in a given category, across users.
    ///
    /// Used by the reclassification pass to revisit `other`-tagged records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_external_activities_by_category(
        &self,
        category: Category,
    ) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, external_id, category, start_date, duration_minutes,
                   distance_km, calories, average_heartrate, points, source, notes
            FROM activities
            WHERE category = ? AND source = ?
            ORDER BY start_date DESC
            ",
        )
        .bind(category.as_str())
        .bind(ActivitySource::Strava.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list activities by category: {e}")))?;

        rows.iter().map(row_to_activity).collect()
    }

    /// Reassign an activity's category and overwrite its points in one step.
    ///
    /// Category and points always change together so stored points never
    /// correspond to a stale classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the activity does not exist.
    pub async fn update_activity_category(
        &self,
        activity_id: &str,
        category: Category,
        points: i64,
        calories: i64,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE activities SET category = ?, points = ?, calories = ? WHERE id = ?",
        )
        .bind(category.as_str())
        .bind(points)
        .bind(calories)
        .bind(activity_id)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update activity category: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Activity {activity_id}")));
        }
        Ok(())
    }

    /// Aggregate a user's points total and per-category breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn points_summary(&self, user_id: Uuid) -> AppResult<PointsSummary> {
        let rows = sqlx::query(
            r"
            SELECT category, COUNT(*) AS activities, COALESCE(SUM(points), 0) AS points
            FROM activities
            WHERE user_id = ?
            GROUP BY category
            ORDER BY points DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate points: {e}")))?;

        let mut categories = Vec::with_capacity(rows.len());
        let mut total_points = 0_i64;
        let mut total_activities = 0_i64;
        for row in rows {
            let category_str: String = row.get("category");
            let category = Category::from_str_value(&category_str).unwrap_or(Category::Other);
            let activities: i64 = row.get("activities");
            let points: i64 = row.get("points");
            total_points += points;
            total_activities += activities;
            categories.push(CategoryPoints {
                category,
                activities,
                points,
            });
        }

        Ok(PointsSummary {
            total_points,
            total_activities,
            categories,
        })
    }
}

/// Convert a database row to an `Activity`.
fn row_to_activity(row: &SqliteRow) -> AppResult<Activity> {
    let user_id_str: String = row.get("user_id");
    let user_id = Uuid::parse_str(&user_id_str)?;
    let category_str: String = row.get("category");
    let source_str: String = row.get("source");

    Ok(Activity {
        id: row.get("id"),
        user_id,
        external_id: row.get("external_id"),
        category: Category::from_str_value(&category_str).unwrap_or(Category::Other),
        start_date: row.get("start_date"),
        duration_minutes: row.get("duration_minutes"),
        distance_km: row.get("distance_km"),
        calories: row.get("calories"),
        average_heartrate: row.get("average_heartrate"),
        points: row.get("points"),
        source: ActivitySource::from_str_value(&source_str).unwrap_or(ActivitySource::Manual),
        notes: row.get("notes"),
    })
}
