// ABOUTME: Sync layer: the token store and the fetch/classify/score/persist engine
// ABOUTME: Both operate through the StravaApi trait so they run unchanged against test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Strava synchronization.
//!
//! The [`TokenStore`] guarantees every outbound call carries a live access
//! token or the caller learns the user is disconnected. The [`SyncEngine`]
//! drives fetch, classify, score, and persist for one user at a time.
//! Concurrent syncs for the same user are tolerated, not excluded: the
//! per-activity duplicate check plus the unique index keep re-runs and
//! overlaps from creating duplicate records.

/// Full and single-activity sync orchestration
pub mod engine;
/// Access token lifecycle (expiry check, refresh, persistence)
pub mod tokens;

pub use engine::{SyncEngine, SyncOutcome};
pub use tokens::TokenStore;
