use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::traits::{Execute, Prepare, Query, Statement, Transaction};
use crate::types::Value;

use super::connection::SqliteConnection;
use super::params::convert_params;
use super::prepared::SqliteStatement;
use super::worker::SqliteWorker;

/// An open transaction routed to the worker that holds the native
/// `rusqlite::Transaction`.
///
/// Once committed or rolled back, every further call answers with the
/// finished-transaction sentinel. Dropping an unfinished transaction rolls
/// it back on the worker.
#[derive(Debug)]
pub struct SqliteTransaction {
    conn: SqliteConnection,
    tx_id: u64,
    finished: bool,
}

impl SqliteTransaction {
    pub(crate) fn new(conn: SqliteConnection, tx_id: u64) -> Self {
        Self {
            conn,
            tx_id,
            finished: false,
        }
    }

    fn live(&self) -> Result<&SqliteWorker, SqlFacadeError> {
        if self.finished {
            Err(SqlFacadeError::TransactionFinished)
        } else {
            Ok(self.conn.worker())
        }
    }
}

#[async_trait]
impl Execute for SqliteTransaction {
    async fn execute(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        let worker = self.live()?;
        worker
            .tx_execute(self.tx_id, Arc::new(query.to_owned()), convert_params(params))
            .await
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        let worker = self.live()?;
        worker.tx_batch(self.tx_id, script.to_owned()).await
    }
}

#[async_trait]
impl Prepare for SqliteTransaction {
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        let sql = Arc::new(query.to_owned());
        let worker = self.live()?;
        worker.tx_prepare(self.tx_id, Arc::clone(&sql)).await?;
        Ok(Box::new(SqliteStatement::for_transaction(
            self.conn.clone(),
            self.tx_id,
            sql,
        )))
    }
}

#[async_trait]
impl Query for SqliteTransaction {
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        let worker = self.live()?;
        worker
            .tx_select(self.tx_id, Arc::new(query.to_owned()), convert_params(params))
            .await
    }

    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        let worker = self.live()?;
        worker
            .tx_select_row(self.tx_id, Arc::new(query.to_owned()), convert_params(params))
            .await
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn commit(&mut self) -> Result<(), SqlFacadeError> {
        let worker = self.live()?;
        let res = worker.commit(self.tx_id).await;
        // The native transaction is consumed either way.
        self.finished = true;
        res
    }

    async fn rollback(&mut self) -> Result<(), SqlFacadeError> {
        let worker = self.live()?;
        let res = worker.rollback(self.tx_id).await;
        self.finished = true;
        res
    }

    async fn statement(
        &mut self,
        stmt: &dyn Statement,
    ) -> Result<Box<dyn Statement>, SqlFacadeError> {
        self.prepare(stmt.sql()).await
    }
}

impl Drop for SqliteTransaction {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(tx_id = self.tx_id, "transaction dropped while open; rolling back");
            self.conn.worker().rollback_nowait(self.tx_id);
        }
    }
}
