use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use deadpool_sqlite::Object;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::traits::{Connection, Execute, Prepare, Query, Statement, Transaction};
use crate::types::{TxOptions, Value};

use super::params::convert_params;
use super::prepared::SqliteStatement;
use super::transaction::SqliteTransaction;
use super::worker::SqliteWorker;

/// A single reserved connection, owned by a worker thread.
///
/// Clones share the same worker; the handle stays cheap to pass into
/// transactions and statements derived from it. Closing any handle shuts
/// the worker down and every other handle starts failing with the
/// closed-connection sentinel.
#[derive(Clone)]
pub struct SqliteConnection {
    worker: Arc<SqliteWorker>,
}

impl SqliteConnection {
    pub(crate) fn new(object: Object) -> Result<Self, SqlFacadeError> {
        Ok(Self {
            worker: Arc::new(SqliteWorker::spawn(object)?),
        })
    }

    pub(crate) fn worker(&self) -> &SqliteWorker {
        &self.worker
    }

    pub(crate) async fn begin_tx(
        &self,
        opts: TxOptions,
    ) -> Result<SqliteTransaction, SqlFacadeError> {
        let tx_id = self.worker.begin(opts.behavior).await?;
        Ok(SqliteTransaction::new(self.clone(), tx_id))
    }
}

#[async_trait]
impl Execute for SqliteConnection {
    async fn execute(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        self.worker
            .execute(query.to_owned(), convert_params(params))
            .await
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        self.worker.batch(script.to_owned()).await
    }
}

#[async_trait]
impl Prepare for SqliteConnection {
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        let sql = Arc::new(query.to_owned());
        self.worker.prepare(Arc::clone(&sql)).await?;
        Ok(Box::new(SqliteStatement::for_connection(self.clone(), sql)))
    }
}

#[async_trait]
impl Query for SqliteConnection {
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.worker
            .select(query.to_owned(), convert_params(params))
            .await
    }

    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.worker
            .select_row(query.to_owned(), convert_params(params))
            .await
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    async fn begin_with(
        &mut self,
        opts: TxOptions,
    ) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        Ok(Box::new(self.begin_tx(opts).await?))
    }

    async fn ping(&mut self) -> Result<(), SqlFacadeError> {
        self.worker.ping().await
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        self.worker.shutdown();
        Ok(())
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("worker_id", &self.worker.worker_id())
            .finish()
    }
}
