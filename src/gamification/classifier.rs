// ABOUTME: Ordered-rule classifier mapping raw provider activities to internal categories
// ABOUTME: Direct sport-type mapping first, then keyword and physiology heuristics, then Other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

use crate::models::{Category, RawActivity};

/// Keywords in the activity name that indicate interval-style training.
const HIIT_KEYWORDS: &[&str] = &[
    "hiit", "workout", "crossfit", "circuit", "tabata", "interval", "wod",
];

/// Keywords in the activity name that indicate strength work.
const GYM_KEYWORDS: &[&str] = &["gym", "weights", "strength", "lifting", "resistance"];

/// Heart rate above which an untyped session counts as vigorous.
const VIGOROUS_HR_THRESHOLD: f64 = 130.0;

/// Minimum duration (minutes) for the vigorous-session heuristic.
const VIGOROUS_MIN_MINUTES: i64 = 10;

/// Minimum duration (minutes) for the stationary-session heuristic.
const STATIONARY_MIN_MINUTES: i64 = 20;

/// A single classification rule. Rules are tried in order; the first match
/// wins.
struct Rule {
    name: &'static str,
    applies: fn(&RawActivity) -> bool,
    category: Category,
}

fn name_has_keyword(raw: &RawActivity, keywords: &[&str]) -> bool {
    let lowered = raw.name.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(kw))
}

fn hiit_keywords(raw: &RawActivity) -> bool {
    name_has_keyword(raw, HIIT_KEYWORDS)
}

fn gym_keywords(raw: &RawActivity) -> bool {
    name_has_keyword(raw, GYM_KEYWORDS)
}

fn vigorous_session(raw: &RawActivity) -> bool {
    raw.average_heartrate
        .is_some_and(|hr| hr > VIGOROUS_HR_THRESHOLD)
        && raw.duration_minutes() > VIGOROUS_MIN_MINUTES
}

fn stationary_session(raw: &RawActivity) -> bool {
    raw.duration_minutes() >= STATIONARY_MIN_MINUTES && raw.distance_meters <= 0.0
}

/// Heuristics for activities whose sport type carries no signal. Order
/// matters: keyword evidence beats physiological evidence.
const RULES: &[Rule] = &[
    Rule {
        name: "hiit_keywords",
        applies: hiit_keywords,
        category: Category::Hiit,
    },
    Rule {
        name: "gym_keywords",
        applies: gym_keywords,
        category: Category::Gym,
    },
    Rule {
        name: "vigorous_session",
        applies: vigorous_session,
        category: Category::Hiit,
    },
    Rule {
        name: "stationary_session",
        applies: stationary_session,
        category: Category::Gym,
    },
];

/// Classify a raw activity into an internal category.
///
/// The provider's sport type wins when it maps directly. Generic types
/// ("Workout" and anything unrecognized) fall through to the heuristic
/// rules, and anything that matches no rule lands in [`Category::Other`]
/// where a later reclassification pass can revisit it.
#[must_use]
pub fn classify(raw: &RawActivity) -> Category {
    if let Some(category) = Category::from_sport_type(&raw.sport_type) {
        return category;
    }

    for rule in RULES {
        if (rule.applies)(raw) {
            tracing::debug!(
                external_id = raw.external_id,
                rule = rule.name,
                category = %rule.category,
                "Heuristic rule matched"
            );
            return rule.category;
        }
    }

    Category::Other
}
