//! Binary crate for the weather records HTTP server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Wiring the axum router over `weather-core`
//! - Serving the embedded frontend

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use weather_core::{Config, HttpWeatherProvider, RecordStore, WeatherService};

mod assets;
mod routes;

/// Weather records backend.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather records backend")]
struct Args {
    /// Path to a TOML config file; defaults to the platform config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Socket address to listen on, e.g. 127.0.0.1:8000.
    #[arg(long)]
    bind: Option<String>,

    /// Path to the SQLite database file.
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let bind = args
        .bind
        .unwrap_or_else(|| config.bind_addr().to_string());
    let database = match args.database {
        Some(path) => path,
        None => config.database_path()?,
    };

    // Create the schema up front so request-scoped opens find it ready.
    RecordStore::open(&database)
        .with_context(|| format!("Failed to open database at {}", database.display()))?;
    log::info!("Using database at {}", database.display());

    let api_key = config.openweather_api_key()?.to_string();
    let provider = Arc::new(HttpWeatherProvider::new(api_key));
    let service = WeatherService::new(provider);
    let router = routes::router(service, database);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    log::info!("Weather backend listening on http://{bind}");
    axum::serve(listener, router).await?;

    Ok(())
}
