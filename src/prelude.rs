//! Convenient imports for common functionality.
//!
//! Pulling the capability traits into scope is what makes the facade
//! methods callable, so most callers start with `use sql_facade::prelude::*;`.

pub use crate::error::SqlFacadeError;
pub use crate::results::{ColumnInfo, ExecResult, Row, RowSet};
pub use crate::traits::{
    Connection, Database, Execute, Prepare, Query, Statement, Transaction,
};
pub use crate::types::{DatabaseKind, PoolStats, TxBehavior, TxOptions, Value};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDatabase, SqliteOptions, SqliteOptionsBuilder};

#[cfg(feature = "test-utils")]
pub use crate::test_utils::{MockDriver, RecordedCall};
