// ABOUTME: Server binary for the workout AI recommendation backend
// ABOUTME: Loads configuration, applies CLI overrides, initializes logging and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout AI Backend Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use workout_ai_backend::{
    config::{load_dotenv, ConfigOverrides, RecommendationMode, ServerConfig},
    logging,
    resources::ServerResources,
    server,
};

#[derive(Parser)]
#[command(name = "workout-ai-backend")]
#[command(about = "Workout AI backend - training recommendations from workout sessions")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override recommendation mode (mock or delegated)
    #[arg(long)]
    mode: Option<RecommendationMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Must run before anything reads the environment, RUST_LOG included
    let dotenv_path = load_dotenv();

    let mut config = ServerConfig::from_env()?;
    config.apply_overrides(ConfigOverrides {
        host: args.host,
        http_port: args.port,
        mode: args.mode,
    });

    logging::init_from_env(config.environment)?;
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded .env file");
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return Err(e.into());
    }

    info!("Starting workout AI backend");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config)?);

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
