// Bootstrap utilities for process initialization
// Loads settings, sets up telemetry, and hands back a ready gateway.

use crate::config::Settings;
use crate::db::DbPool;
use crate::gateway::QueryGateway;
use crate::telemetry;
use anyhow::{Context, Result};
use tracing::info;

/// Load and validate settings from `config/` and the environment
pub fn load_settings() -> Result<Settings> {
    let settings = Settings::load().context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(settings)
}

/// Initialize logging, and the metrics exporter when a port is configured
pub fn init_observability(settings: &Settings) -> Result<()> {
    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.tracing_endpoint.as_deref(),
    )?;

    if let Some(port) = settings.observability.metrics_port {
        telemetry::init_metrics(port)?;
    }

    Ok(())
}

/// Connect the pool, verify it, and build the gateway
///
/// # Errors
/// Returns error if the pool cannot connect or the health check fails
#[tracing::instrument(skip(settings))]
pub async fn init_gateway(settings: &Settings) -> Result<QueryGateway> {
    let pool = DbPool::new(&settings.database)
        .await
        .context("Failed to create database pool")?;

    pool.health_check()
        .await
        .context("Database health check failed")?;

    let gateway = QueryGateway::new(pool, settings.database.query_timeout());

    info!(
        query_timeout_seconds = settings.database.query_timeout_seconds,
        "Query gateway initialized"
    );
    Ok(gateway)
}
