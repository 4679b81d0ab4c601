//! The polymorphic surface of the crate.
//!
//! Application code holds `Box<dyn Database>` (or `&mut dyn ...`) and never
//! names a concrete driver type, so a scripted mock can stand in for the
//! real pooled backend in tests. Every method forwards to the wrapped
//! library; cancellation and deadlines are the caller's to impose on the
//! returned futures.

use async_trait::async_trait;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::types::{DatabaseKind, PoolStats, TxOptions, Value};

/// Ability to run mutating statements.
#[async_trait]
pub trait Execute: Send {
    /// Run a single INSERT/UPDATE/DELETE/DDL statement with bound
    /// parameters and report the driver's outcome unchanged.
    async fn execute(&mut self, query: &str, params: &[Value])
    -> Result<ExecResult, SqlFacadeError>;

    /// Run a multi-statement script with no parameters.
    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError>;
}

/// Ability to compile a statement for repeated execution.
#[async_trait]
pub trait Prepare: Send {
    /// Compile `query` on the underlying handle and return a statement
    /// bound to the same scope (pool, reserved connection, or transaction).
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError>;
}

/// Ability to run reads.
#[async_trait]
pub trait Query: Send {
    /// Run a SELECT and materialize every matched row.
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError>;

    /// Run a SELECT expected to match one row.
    ///
    /// # Errors
    /// Returns [`SqlFacadeError::NoRows`] when the query matches nothing,
    /// with the same identity the wrapped driver reports.
    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError>;
}

/// A database handle backed by a connection pool.
#[async_trait]
pub trait Database: Execute + Prepare + Query + Send + Sync {
    /// Begin a transaction on a connection reserved from the pool.
    async fn begin(&mut self) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        self.begin_with(TxOptions::default()).await
    }

    /// Begin a transaction with explicit options.
    async fn begin_with(&mut self, opts: TxOptions)
    -> Result<Box<dyn Transaction>, SqlFacadeError>;

    /// Reserve a single connection for exclusive use until closed.
    async fn connection(&mut self) -> Result<Box<dyn Connection>, SqlFacadeError>;

    /// Verify the database is reachable.
    async fn ping(&mut self) -> Result<(), SqlFacadeError>;

    /// Close the pool. Later operations fail with
    /// [`SqlFacadeError::ConnectionClosed`].
    async fn close(&mut self) -> Result<(), SqlFacadeError>;

    /// Which driver backs this handle.
    fn kind(&self) -> DatabaseKind;

    /// Pool statistics snapshot, passed through from the pool.
    fn stats(&self) -> PoolStats;

    /// Change the maximum number of open connections.
    fn resize(&self, max_connections: usize);
}

/// A single reserved connection.
#[async_trait]
pub trait Connection: Execute + Prepare + Query + Send + std::fmt::Debug {
    /// Begin a transaction on this connection.
    async fn begin(&mut self) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        self.begin_with(TxOptions::default()).await
    }

    /// Begin a transaction on this connection with explicit options.
    async fn begin_with(&mut self, opts: TxOptions)
    -> Result<Box<dyn Transaction>, SqlFacadeError>;

    /// Verify the connection is alive.
    async fn ping(&mut self) -> Result<(), SqlFacadeError>;

    /// Release the underlying connection. Later operations on this handle
    /// (and statements derived from it) fail with
    /// [`SqlFacadeError::ConnectionClosed`].
    async fn close(&mut self) -> Result<(), SqlFacadeError>;
}

/// An open transaction.
///
/// After [`Transaction::commit`] or [`Transaction::rollback`] every
/// operation fails with [`SqlFacadeError::TransactionFinished`]. Dropping
/// an unfinished transaction rolls it back.
#[async_trait]
pub trait Transaction: Execute + Prepare + Query + Send + std::fmt::Debug {
    async fn commit(&mut self) -> Result<(), SqlFacadeError>;

    async fn rollback(&mut self) -> Result<(), SqlFacadeError>;

    /// Rebind an existing statement to run inside this transaction.
    async fn statement(&mut self, stmt: &dyn Statement)
    -> Result<Box<dyn Statement>, SqlFacadeError>;
}

/// A compiled statement, reusable until closed.
#[async_trait]
pub trait Statement: Send + Sync + std::fmt::Debug {
    async fn execute(&mut self, params: &[Value]) -> Result<ExecResult, SqlFacadeError>;

    async fn query(&mut self, params: &[Value]) -> Result<RowSet, SqlFacadeError>;

    /// # Errors
    /// Returns [`SqlFacadeError::NoRows`] when nothing matches.
    async fn query_row(&mut self, params: &[Value]) -> Result<Row, SqlFacadeError>;

    /// Release the statement handle.
    async fn close(&mut self) -> Result<(), SqlFacadeError>;

    /// The SQL text this statement was prepared from.
    fn sql(&self) -> &str;
}
