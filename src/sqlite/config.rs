use std::time::Duration;

use deadpool_sqlite::{Config as DeadpoolSqliteConfig, Runtime};

use crate::error::SqlFacadeError;

use super::database::SqliteDatabase;

/// Options for configuring the `SQLite` pool.
///
/// Idle policy and timeouts are fixed at pool construction by the pool
/// implementation, so they are open-time options here; the maximum pool
/// size can still be changed later through `Database::resize`.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub max_connections: Option<usize>,
    pub wait_timeout: Option<Duration>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            max_connections: None,
            wait_timeout: None,
        }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.opts.max_connections = Some(max_connections);
        self
    }

    #[must_use]
    pub fn wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.opts.wait_timeout = Some(wait_timeout);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a [`SqliteDatabase`] with these options.
    ///
    /// # Errors
    /// Returns `SqlFacadeError` if pool creation or the initial smoke test
    /// fails.
    pub async fn build(self) -> Result<SqliteDatabase, SqlFacadeError> {
        SqliteDatabase::open(self.finish()).await
    }
}

impl SqliteDatabase {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open a pooled database handle.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConnectionError` if pool creation or the
    /// initial connection test fails.
    pub async fn open(opts: SqliteOptions) -> Result<Self, SqlFacadeError> {
        let mut cfg = DeadpoolSqliteConfig::new(opts.db_path.clone());
        if opts.max_connections.is_some() || opts.wait_timeout.is_some() {
            let mut pool_cfg = deadpool::managed::PoolConfig::default();
            if let Some(n) = opts.max_connections {
                pool_cfg.max_size = n;
            }
            pool_cfg.timeouts.wait = opts.wait_timeout;
            cfg.pool = Some(pool_cfg);
        }

        let pool = cfg.create_pool(Runtime::Tokio1).map_err(|e| {
            SqlFacadeError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
        })?;

        // Smoke-test one connection and switch on WAL before handing the
        // pool out.
        {
            let conn = pool.get().await?;
            conn.interact(|conn| {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(SqlFacadeError::from)
            })
            .await??;
        }
        tracing::debug!(path = %opts.db_path, "created SQLite connection pool");

        Ok(SqliteDatabase::from_pool(pool))
    }
}
