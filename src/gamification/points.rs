// ABOUTME: Points computation and calorie estimation for classified activities
// ABOUTME: Integer-only points arithmetic so monotonicity in duration holds exactly

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::models::Category;

/// Average heart rate at or above which the intensity bonus applies.
const INTENSITY_HR_THRESHOLD: f64 = 150.0;

/// Points per minute for a category.
const fn base_rate(category: Category) -> i64 {
    match category {
        Category::Hiit => 8,
        Category::Run | Category::Swim => 7,
        Category::Bike | Category::Hike | Category::Gym => 5,
        Category::Yoga => 4,
        Category::Other => 3,
        Category::Walk => 2,
    }
}

/// Points per kilometer for distance-bearing categories.
const fn distance_rate(category: Category) -> i64 {
    match category {
        Category::Run => 10,
        Category::Hike => 8,
        Category::Bike => 4,
        Category::Walk => 3,
        Category::Swim
        | Category::Gym
        | Category::Yoga
        | Category::Hiit
        | Category::Other => 0,
    }
}

/// Compute gamification points for a classified activity.
///
/// Base rate times duration, plus a per-kilometer component for categories
/// where distance is meaningful, with a 10% bonus for sustained high heart
/// rate. Duration contributes through integer math only, so points are
/// monotonic non-decreasing in duration for a fixed category and distance.
#[must_use]
pub fn compute_points(
    category: Category,
    duration_minutes: i64,
    distance_km: f64,
    average_heartrate: Option<f64>,
) -> i64 {
    let minutes = duration_minutes.max(0);
    let distance = distance_km.max(0.0);

    let mut points = base_rate(category) * minutes;
    points += (distance_rate(category) as f64 * distance).round() as i64;

    if average_heartrate.is_some_and(|hr| hr >= INTENSITY_HR_THRESHOLD) {
        points = points * 11 / 10;
    }

    points.max(0)
}

/// MET value (metabolic equivalent) per category, scaled by 10 to stay in
/// integer-friendly territory for the table.
const fn met_times_ten(category: Category) -> i64 {
    match category {
        Category::Hiit => 100,
        Category::Run => 98,
        Category::Swim => 80,
        Category::Bike => 75,
        Category::Hike => 65,
        Category::Gym => 50,
        Category::Other => 40,
        Category::Walk => 35,
        Category::Yoga => 30,
    }
}

/// Assumed body mass when the user profile carries none.
const DEFAULT_WEIGHT_KG: f64 = 75.0;

/// Estimate calories burned from category, duration, and heart rate.
///
/// Standard MET formula (`kcal/min = MET * 3.5 * weight / 200`) with a flat
/// weight assumption, bumped 10% for sustained high heart rate. An estimate
/// only; stored for display, never fed back into scoring.
#[must_use]
pub fn estimate_calories(
    category: Category,
    duration_minutes: i64,
    average_heartrate: Option<f64>,
) -> i64 {
    let minutes = duration_minutes.max(0) as f64;
    let met = met_times_ten(category) as f64 / 10.0;
    let mut kcal = met * 3.5 * DEFAULT_WEIGHT_KG / 200.0 * minutes;

    if average_heartrate.is_some_and(|hr| hr >= INTENSITY_HR_THRESHOLD) {
        kcal *= 1.1;
    }

    kcal.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_scores_duration_plus_distance() {
        // 30 min * 7 + 5 km * 10
        assert_eq!(compute_points(Category::Run, 30, 5.0, None), 260);
    }

    #[test]
    fn hiit_outscores_walk_per_minute() {
        let hiit = compute_points(Category::Hiit, 30, 0.0, None);
        let walk = compute_points(Category::Walk, 30, 0.0, None);
        assert!(hiit > walk);
    }

    #[test]
    fn high_heart_rate_adds_ten_percent() {
        let base = compute_points(Category::Run, 30, 0.0, None);
        let boosted = compute_points(Category::Run, 30, 0.0, Some(160.0));
        assert_eq!(boosted, base * 11 / 10);
    }

    #[test]
    fn heart_rate_below_threshold_adds_nothing() {
        let base = compute_points(Category::Run, 30, 0.0, None);
        let same = compute_points(Category::Run, 30, 0.0, Some(149.9));
        assert_eq!(base, same);
    }

    #[test]
    fn monotonic_in_duration_for_fixed_category() {
        for category in [
            Category::Run,
            Category::Bike,
            Category::Swim,
            Category::Gym,
            Category::Yoga,
            Category::Walk,
            Category::Hike,
            Category::Hiit,
            Category::Other,
        ] {
            let mut previous = compute_points(category, 0, 0.0, Some(160.0));
            for minutes in 1..=120 {
                let current = compute_points(category, minutes, 0.0, Some(160.0));
                assert!(
                    current >= previous,
                    "points decreased for {category} at {minutes} minutes"
                );
                previous = current;
            }
        }
    }

    #[test]
    fn never_negative() {
        assert_eq!(compute_points(Category::Run, -5, -1.0, None), 0);
        assert_eq!(compute_points(Category::Other, 0, 0.0, None), 0);
    }

    #[test]
    fn calorie_estimate_scales_with_duration() {
        let short = estimate_calories(Category::Run, 20, None);
        let long = estimate_calories(Category::Run, 60, None);
        assert!(long > short);
        assert_eq!(long, short * 3);
    }

    #[test]
    fn calorie_estimate_hr_bonus() {
        let base = estimate_calories(Category::Hiit, 30, None);
        let boosted = estimate_calories(Category::Hiit, 30, Some(165.0));
        assert!(boosted > base);
    }
}
