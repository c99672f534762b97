// ABOUTME: Gamification layer: deterministic workout classification and points scoring
// ABOUTME: Classification is a pure function of the raw activity; points are a pure function of the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Classification and scoring.
//!
//! Both passes are pure functions over a [`crate::models::RawActivity`]:
//! no clock, no randomness, no I/O. The same raw record always classifies
//! and scores the same way, which is what makes reclassification safe to
//! run at any time.

/// Ordered-rule workout classifier
pub mod classifier;
/// Points computation and calorie estimation
pub mod points;

pub use classifier::classify;
pub use points::{compute_points, estimate_calories};
