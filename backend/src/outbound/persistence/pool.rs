//! PostgreSQL connection pool and schema migrations.
//!
//! Wraps `diesel-async` with `bb8`. Migrations are embedded at compile time
//! and applied over a short-lived synchronous connection on a blocking
//! thread before the pool is handed out.

use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors that can occur while building or using the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// Pending migrations could not be applied.
    #[error("failed to apply migrations: {message}")]
    Migration { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// ```
/// use std::time::Duration;
/// use client_card::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/clients")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.database_url(), "postgres://localhost/clients");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Configuration with 10 connections and a 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Apply pending migrations, then build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Migration`] if the schema cannot be brought up to
    /// date and [`PoolError::Build`] if the pool cannot be constructed.
    pub async fn migrated(config: PoolConfig) -> Result<Self, PoolError> {
        run_migrations(config.database_url.clone()).await?;
        Self::new(config).await
    }

    /// Build the pool without touching the schema.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the pool cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if no connection is available within
    /// the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

async fn run_migrations(database_url: String) -> Result<(), PoolError> {
    let applied = tokio::task::spawn_blocking(move || -> Result<usize, PoolError> {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| PoolError::migration(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::migration(err.to_string()))?;
        Ok(applied.len())
    })
    .await
    .map_err(|err| PoolError::migration(err.to_string()))??;
    info!(applied, "database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_config_defaults() {
        let config = PoolConfig::new("postgres://localhost/test");

        assert_eq!(config.database_url(), "postgres://localhost/test");
        assert_eq!(config.max_size, 10);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn pool_config_overrides() {
        let config = PoolConfig::new("postgres://localhost/test")
            .with_max_size(2)
            .with_connection_timeout(Duration::from_millis(500));

        assert_eq!(config.max_size, 2);
        assert_eq!(config.connection_timeout, Duration::from_millis(500));
    }

    #[rstest]
    #[case::checkout(PoolError::checkout("connection refused"), "connection refused")]
    #[case::build(PoolError::build("invalid URL"), "invalid URL")]
    #[case::migration(PoolError::migration("relation exists"), "relation exists")]
    fn pool_error_display_carries_message(#[case] error: PoolError, #[case] fragment: &str) {
        assert!(error.to_string().contains(fragment));
    }
}
