// ABOUTME: Crate root for the Strava ingestion and reward-computation service
// ABOUTME: Wires config, database, provider client, sync engine, and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Stridesync ingests workout data from Strava and turns it into
//! gamification points.
//!
//! Pipeline: webhook event or manual sync request, then the sync engine,
//! then the token store (valid token or "disconnected"), then the activity
//! fetcher, the classifier, the points calculator, and finally persistence
//! with duplicate suppression keyed by external activity id.

/// Server configuration from environment variables
pub mod config;
/// Database layer (`SQLite` via sqlx)
pub mod database;
/// Unified error handling
pub mod errors;
/// Classification and points scoring
pub mod gamification;
/// Core data models
pub mod models;
/// Fitness provider clients and the provider trait
pub mod providers;
/// Shared server resources
pub mod resources;
/// HTTP route handlers
pub mod routes;
/// Sync engine and token store
pub mod sync;
