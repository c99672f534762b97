// ABOUTME: Operator utility: re-run the classifier over other-tagged synced activities
// ABOUTME: Recomputes points and calories for every record whose category changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Reclassification pass.
//!
//! Classifier rules evolve; records tagged `other` under old rules may now
//! match. This is a deliberate operator action rather than something every
//! sync does, so classification stays stable between releases unless
//! someone explicitly asks for a re-run.

use anyhow::Result;
use clap::Parser;
use stridesync::database::Database;
use stridesync::gamification::{classify, compute_points, estimate_calories};
use stridesync::models::{Category, RawActivity};
use tracing::info;

#[derive(Parser)]
#[command(name = "reclassify")]
#[command(about = "Re-run the classifier over other-tagged synced activities")]
#[command(version)]
struct Cli {
    /// Database URL (defaults to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:stridesync.db".to_owned()),
    };

    let db = Database::new(&database_url).await?;

    let candidates = db
        .list_external_activities_by_category(Category::Other)
        .await?;
    info!(candidates = candidates.len(), "Scanning other-tagged synced activities");

    let mut changed = 0_usize;
    for activity in &candidates {
        // Rebuild the classifier's input from the stored record. The raw
        // sport type was never persisted, so it stays generic and only the
        // heuristic rules can fire, same as at original ingestion time.
        let raw = RawActivity {
            external_id: activity.external_id.unwrap_or_default(),
            sport_type: "other".to_owned(),
            name: activity.notes.clone().unwrap_or_default(),
            duration_seconds: activity.duration_minutes * 60,
            distance_meters: activity.distance_km * 1000.0,
            average_heartrate: activity.average_heartrate,
            start_date: activity.start_date,
        };

        let category = classify(&raw);
        if category == activity.category {
            continue;
        }

        let points = compute_points(
            category,
            activity.duration_minutes,
            activity.distance_km,
            activity.average_heartrate,
        );
        let calories =
            estimate_calories(category, activity.duration_minutes, activity.average_heartrate);

        info!(
            id = %activity.id,
            from = %activity.category,
            to = %category,
            old_points = activity.points,
            new_points = points,
            "Reclassified"
        );

        if !cli.dry_run {
            db.update_activity_category(&activity.id, category, points, calories)
                .await?;
        }
        changed += 1;
    }

    let verb = if cli.dry_run { "would change" } else { "changed" };
    info!(scanned = candidates.len(), "Reclassification pass finished: {changed} records {verb}");

    Ok(())
}
