// ABOUTME: Core data models: workout categories, activities, and Strava connections
// ABOUTME: RawActivity is the ephemeral provider shape; Activity is the persisted internal record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Common data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed internal workout classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Running (road, trail, treadmill)
    Run,
    /// Cycling in any form
    Bike,
    /// Swimming
    Swim,
    /// Gym / strength work
    Gym,
    /// Yoga and mobility
    Yoga,
    /// Walking
    Walk,
    /// Hiking
    Hike,
    /// High-intensity interval training
    Hiit,
    /// Anything that matched no rule
    Other,
}

impl Category {
    /// Stable string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Bike => "bike",
            Self::Swim => "swim",
            Self::Gym => "gym",
            Self::Yoga => "yoga",
            Self::Walk => "walk",
            Self::Hike => "hike",
            Self::Hiit => "hiit",
            Self::Other => "other",
        }
    }

    /// Parse the stored string form.
    #[must_use]
    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "run" => Some(Self::Run),
            "bike" => Some(Self::Bike),
            "swim" => Some(Self::Swim),
            "gym" => Some(Self::Gym),
            "yoga" => Some(Self::Yoga),
            "walk" => Some(Self::Walk),
            "hike" => Some(Self::Hike),
            "hiit" => Some(Self::Hiit),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Map a provider sport-type string directly to a category.
    ///
    /// Returns `None` for unknown or generic types ("Workout", "other") so
    /// the heuristic rules get a chance to backfill the missing signal.
    #[must_use]
    pub fn from_sport_type(sport_type: &str) -> Option<Self> {
        match sport_type {
            "Run" | "TrailRun" | "VirtualRun" => Some(Self::Run),
            "Ride" | "VirtualRide" | "MountainBikeRide" | "GravelRide" | "EBikeRide" => {
                Some(Self::Bike)
            }
            "Swim" => Some(Self::Swim),
            "WeightTraining" => Some(Self::Gym),
            "Yoga" | "Pilates" => Some(Self::Yoga),
            "Walk" => Some(Self::Walk),
            "Hike" => Some(Self::Hike),
            "Crossfit" | "HighIntensityIntervalTraining" => Some(Self::Hiit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an activity record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    /// Entered by the user in the app
    Manual,
    /// Synced from the Strava API
    Strava,
}

impl ActivitySource {
    /// Stable string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Strava => "strava",
        }
    }

    /// Parse the stored string form.
    #[must_use]
    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "strava" => Some(Self::Strava),
            _ => None,
        }
    }
}

/// Unprocessed workout record as returned by the provider's API.
///
/// Ephemeral: fetched, classified, scored, and discarded. Never persisted
/// verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawActivity {
    /// Provider-side activity id
    #[serde(rename = "id")]
    pub external_id: i64,
    /// Raw sport-type string from the provider taxonomy
    pub sport_type: String,
    /// Free-text name/notes
    pub name: String,
    /// Moving time in seconds
    #[serde(rename = "moving_time")]
    pub duration_seconds: i64,
    /// Distance in meters
    #[serde(rename = "distance", default)]
    pub distance_meters: f64,
    /// Average heart rate, when recorded
    #[serde(rename = "average_heartrate", default)]
    pub average_heartrate: Option<f64>,
    /// Activity start timestamp
    pub start_date: DateTime<Utc>,
}

impl RawActivity {
    /// Duration in whole minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> i64 {
        self.duration_seconds / 60
    }

    /// Distance in kilometers.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

/// Persisted activity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Record id
    pub id: String,
    /// Owning user
    pub user_id: Uuid,
    /// Provider-side activity id; `None` for manual entries
    pub external_id: Option<i64>,
    /// Normalized workout category
    pub category: Category,
    /// Activity start timestamp
    pub start_date: DateTime<Utc>,
    /// Duration in minutes
    pub duration_minutes: i64,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Estimated calories burned
    pub calories: i64,
    /// Average heart rate, when recorded
    pub average_heartrate: Option<f64>,
    /// Gamification points; recomputed whenever the category changes
    pub points: i64,
    /// Record origin
    pub source: ActivitySource,
    /// Free-text notes
    pub notes: Option<String>,
}

/// A user's stored OAuth credential state for Strava. One per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaConnection {
    /// Owning user
    pub user_id: Uuid,
    /// Strava athlete id, used to resolve webhook events
    pub athlete_id: i64,
    /// Current access token
    pub access_token: String,
    /// Current refresh token
    pub refresh_token: String,
    /// Access token expiry
    pub expires_at: DateTime<Utc>,
    /// Granted OAuth scope
    pub scope: Option<String>,
    /// When the connection was first established
    pub connected_at: DateTime<Utc>,
    /// Last successful sync; `None` before the first sync
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Per-category slice of a points summary.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPoints {
    /// Workout category
    pub category: Category,
    /// Number of activities in the category
    pub activities: i64,
    /// Total points in the category
    pub points: i64,
}

/// Aggregated points for one user.
#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    /// Total points across all activities
    pub total_points: i64,
    /// Total activity count
    pub total_activities: i64,
    /// Per-category breakdown
    pub categories: Vec<CategoryPoints>,
}
