//! Interface-first facade over a pooled `SQLite` client.
//!
//! Application code depends on the traits in [`traits`] (`Database`,
//! `Connection`, `Transaction`, `Statement`, and the `Execute`/`Prepare`/
//! `Query` capabilities) instead of concrete driver types. The `sqlite`
//! module provides the real delegating backend; the `test-utils` feature
//! provides a scripted mock implementing the same traits, so the seam can
//! be swapped in tests without touching calling code.
//!
//! Every operation forwards to the wrapped driver stack and passes its
//! results and errors through unchanged. The three sentinel conditions
//! (closed handle, no rows, finished transaction) keep their identity as
//! [`SqlFacadeError`] variants.

pub mod error;
pub mod prelude;
pub mod results;
pub mod traits;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::SqlFacadeError;
pub use results::{ColumnInfo, ExecResult, Row, RowSet};
pub use traits::{Connection, Database, Execute, Prepare, Query, Statement, Transaction};
pub use types::{DatabaseKind, PoolStats, TxBehavior, TxOptions, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteDatabase, SqliteOptions, SqliteOptionsBuilder};
