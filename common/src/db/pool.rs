// PostgreSQL connection pool
// The pool owns the bounded set of physical connections; repositories borrow it per query.

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper
/// Provides a managed connection pool to PostgreSQL with health checking
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create a new database connection pool
    ///
    /// # Errors
    /// Returns `DatabaseError::ConnectionFailed` if unable to establish connection
    #[instrument(skip(config), fields(host = %config.host, database = %config.name, max_connections = config.max_connections))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database connection pool");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(config.connect_options())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                DatabaseError::ConnectionFailed(e.to_string())
            })?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool initialized successfully"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing sqlx pool (used by tests that build their own)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Get the current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Get the number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[tokio::test]
    async fn test_unreachable_host_is_connection_failure() {
        let mut config = Settings::default().database;
        // Reserved TEST-NET-1 address; nothing listens there
        config.host = "192.0.2.1".to_string();
        config.connect_timeout_seconds = 1;
        config.min_connections = 1;

        let result = DbPool::new(&config).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL instance
    async fn test_health_check() {
        let settings = Settings::load().unwrap();
        let pool = DbPool::new(&settings.database).await.unwrap();
        assert!(pool.health_check().await.is_ok());
    }
}
