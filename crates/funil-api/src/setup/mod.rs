//! Application setup and initialization
//!
//! Startup order: validate configuration, install the tracing subscriber,
//! connect and migrate the database, build state, build the router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::constants::SERVICE_NAME;
use crate::state::AppState;
use anyhow::{Context, Result};
use funil_core::Config;
use funil_infra::{init_telemetry, LogFormat};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    init_telemetry(SERVICE_NAME, config.environment(), LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let state = services::initialize_services(&config, pool);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
