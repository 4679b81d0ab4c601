use thiserror::Error;

#[cfg(feature = "sqlite")]
use deadpool_sqlite::rusqlite;

/// Crate-wide error type.
///
/// The three sentinel conditions (`ConnectionClosed`, `NoRows`,
/// `TransactionFinished`) are unit variants so callers can test for them by
/// identity with `matches!` rather than by message text. Everything the
/// underlying driver reports is passed through untranslated.
#[derive(Debug, Error)]
pub enum SqlFacadeError {
    /// The database handle or reserved connection has already been closed.
    #[error("connection is already closed")]
    ConnectionClosed,

    /// A single-row query matched no rows.
    #[error("no rows in result set")]
    NoRows,

    /// The transaction has already been committed or rolled back.
    #[error("transaction has already been committed or rolled back")]
    TransactionFinished,

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(rusqlite::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolError(deadpool::managed::PoolError<rusqlite::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlFacadeError {
    /// Whether this is the closed-handle sentinel.
    #[must_use]
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }

    /// Whether this is the no-rows sentinel.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Whether this is the finished-transaction sentinel.
    #[must_use]
    pub fn is_transaction_finished(&self) -> bool {
        matches!(self, Self::TransactionFinished)
    }
}

// The driver's own no-rows value normalizes to the sentinel variant so its
// identity survives the trip through the facade.
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for SqlFacadeError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => SqlFacadeError::NoRows,
            other => SqlFacadeError::SqliteError(other),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<deadpool::managed::PoolError<rusqlite::Error>> for SqlFacadeError {
    fn from(err: deadpool::managed::PoolError<rusqlite::Error>) -> Self {
        match err {
            deadpool::managed::PoolError::Closed => SqlFacadeError::ConnectionClosed,
            deadpool::managed::PoolError::Backend(e) => e.into(),
            other => SqlFacadeError::PoolError(other),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for SqlFacadeError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        SqlFacadeError::ConnectionError(format!("SQLite interact error: {err}"))
    }
}
