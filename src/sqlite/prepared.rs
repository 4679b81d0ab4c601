use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::traits::Statement;
use crate::types::Value;

use super::connection::SqliteConnection;
use super::database::SqliteDatabase;
use super::params::convert_params;

/// Where a prepared statement runs: against the pool at large, a reserved
/// connection, or inside an open transaction.
#[derive(Debug)]
enum StatementTarget {
    Pool(SqliteDatabase),
    Conn(SqliteConnection),
    Tx { conn: SqliteConnection, tx_id: u64 },
}

/// Handle to a compiled statement.
///
/// The statement itself lives in rusqlite's per-connection cache keyed by
/// its SQL text; the handle carries the text plus the scope it was prepared
/// for. Pool-scoped handles re-enter the cache of whichever connection
/// serves the call, which is what lets one handle outlive any single pooled
/// connection.
#[derive(Debug)]
pub struct SqliteStatement {
    target: StatementTarget,
    sql: Arc<String>,
    closed: bool,
}

impl SqliteStatement {
    pub(crate) fn for_pool(db: SqliteDatabase, sql: Arc<String>) -> Self {
        Self {
            target: StatementTarget::Pool(db),
            sql,
            closed: false,
        }
    }

    pub(crate) fn for_connection(conn: SqliteConnection, sql: Arc<String>) -> Self {
        Self {
            target: StatementTarget::Conn(conn),
            sql,
            closed: false,
        }
    }

    pub(crate) fn for_transaction(conn: SqliteConnection, tx_id: u64, sql: Arc<String>) -> Self {
        Self {
            target: StatementTarget::Tx { conn, tx_id },
            sql,
            closed: false,
        }
    }

    fn live(&self) -> Result<(), SqlFacadeError> {
        if self.closed {
            Err(SqlFacadeError::ExecutionError(
                "prepared statement already closed".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Statement for SqliteStatement {
    async fn execute(&mut self, params: &[Value]) -> Result<ExecResult, SqlFacadeError> {
        self.live()?;
        let params = convert_params(params);
        match &self.target {
            StatementTarget::Pool(db) => db.exec_cached(Arc::clone(&self.sql), params).await,
            StatementTarget::Conn(conn) => {
                conn.worker()
                    .prepared_execute(Arc::clone(&self.sql), params)
                    .await
            }
            StatementTarget::Tx { conn, tx_id } => {
                conn.worker()
                    .tx_execute(*tx_id, Arc::clone(&self.sql), params)
                    .await
            }
        }
    }

    async fn query(&mut self, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.live()?;
        let params = convert_params(params);
        match &self.target {
            StatementTarget::Pool(db) => db.select_cached(Arc::clone(&self.sql), params).await,
            StatementTarget::Conn(conn) => {
                conn.worker()
                    .prepared_select(Arc::clone(&self.sql), params)
                    .await
            }
            StatementTarget::Tx { conn, tx_id } => {
                conn.worker()
                    .tx_select(*tx_id, Arc::clone(&self.sql), params)
                    .await
            }
        }
    }

    async fn query_row(&mut self, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.live()?;
        let params = convert_params(params);
        match &self.target {
            StatementTarget::Pool(db) => db.select_row_cached(Arc::clone(&self.sql), params).await,
            StatementTarget::Conn(conn) => {
                conn.worker()
                    .prepared_select_row(Arc::clone(&self.sql), params)
                    .await
            }
            StatementTarget::Tx { conn, tx_id } => {
                conn.worker()
                    .tx_select_row(*tx_id, Arc::clone(&self.sql), params)
                    .await
            }
        }
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        // The cached native statement is owned by its connection; the
        // handle only has to stop accepting work.
        self.closed = true;
        Ok(())
    }

    fn sql(&self) -> &str {
        &self.sql
    }
}
