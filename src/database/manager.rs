use std::sync::OnceLock;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide connection pool built from DATABASE_URL
///
/// The pool is created lazily: connections are only opened when the first
/// query runs, so the binary starts (and unit tests run) without a database.
pub struct DatabaseManager;

impl DatabaseManager {
    pub fn pool() -> Result<PgPool, DatabaseError> {
        static POOL: OnceLock<PgPool> = OnceLock::new();

        if let Some(pool) = POOL.get() {
            return Ok(pool.clone());
        }

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout_secs))
            .connect_lazy(&url)?;

        let pool = POOL.get_or_init(|| pool).clone();
        info!("Created database pool");
        Ok(pool)
    }

    /// Pings the database to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
