// ABOUTME: Server binary: loads config, opens the database, and serves the HTTP API
// ABOUTME: CLI flags can override the listen port and database URL from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

//! Stridesync HTTP server.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use stridesync::config::ServerConfig;
use stridesync::database::Database;
use stridesync::providers::StravaClient;
use stridesync::resources::ServerResources;
use stridesync::routes;
use tracing::info;

#[derive(Parser)]
#[command(name = "stridesync-server")]
#[command(about = "Strava activity ingestion and points service")]
#[command(version)]
struct Cli {
    /// HTTP port to listen on (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
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

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = cli.port {
        config.http_port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let database = Database::new(&config.database_url).await?;
    info!(database_url = %config.database_url, "Database ready");

    let strava = Arc::new(StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    ));

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, database, strava));
    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Stridesync server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
