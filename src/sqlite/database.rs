use std::sync::Arc;

use async_trait::async_trait;
use deadpool_sqlite::Pool;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::traits::{Connection, Database, Execute, Prepare, Query, Statement, Transaction};
use crate::types::{DatabaseKind, PoolStats, TxOptions, Value};

use super::connection::SqliteConnection;
use super::params::convert_params;
use super::prepared::SqliteStatement;
use super::query;

/// Database handle backed by the `SQLite` connection pool.
///
/// Clones share the pool. One-shot operations borrow a pooled connection
/// for the duration of the call; transactions and reserved connections
/// check one out until they finish.
#[derive(Clone, Debug)]
pub struct SqliteDatabase {
    pool: Pool,
}

impl SqliteDatabase {
    pub(crate) fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    async fn with_conn<R, F>(&self, func: F) -> Result<R, SqlFacadeError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlFacadeError> + Send + 'static,
        R: Send + 'static,
    {
        let object = self.pool.get().await?;
        object.interact(func).await?
    }

    pub(crate) async fn exec_cached(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<ExecResult, SqlFacadeError> {
        self.with_conn(move |conn| query::run_execute_cached(conn, &sql, &params))
            .await
    }

    pub(crate) async fn select_cached(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<RowSet, SqlFacadeError> {
        self.with_conn(move |conn| query::run_select_cached(conn, &sql, &params))
            .await
    }

    pub(crate) async fn select_row_cached(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Row, SqlFacadeError> {
        self.with_conn(move |conn| query::run_select_row_cached(conn, &sql, &params))
            .await
    }
}

#[async_trait]
impl Execute for SqliteDatabase {
    async fn execute(
        &mut self,
        query_sql: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        let sql = query_sql.to_owned();
        let params = convert_params(params);
        self.with_conn(move |conn| query::run_execute(conn, &sql, &params))
            .await
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        let script = script.to_owned();
        self.with_conn(move |conn| query::run_batch(conn, &script))
            .await
    }
}

#[async_trait]
impl Prepare for SqliteDatabase {
    async fn prepare(&mut self, query_sql: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        let sql = Arc::new(query_sql.to_owned());
        let check = Arc::clone(&sql);
        self.with_conn(move |conn| query::validate_cached(conn, &check))
            .await?;
        Ok(Box::new(SqliteStatement::for_pool(self.clone(), sql)))
    }
}

#[async_trait]
impl Query for SqliteDatabase {
    async fn query(&mut self, query_sql: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        let sql = query_sql.to_owned();
        let params = convert_params(params);
        self.with_conn(move |conn| query::run_select(conn, &sql, &params))
            .await
    }

    async fn query_row(&mut self, query_sql: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        let sql = query_sql.to_owned();
        let params = convert_params(params);
        self.with_conn(move |conn| query::run_select_row(conn, &sql, &params))
            .await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn begin_with(&mut self, opts: TxOptions) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        let object = self.pool.get().await?;
        let conn = SqliteConnection::new(object)?;
        Ok(Box::new(conn.begin_tx(opts).await?))
    }

    async fn connection(&mut self) -> Result<Box<dyn Connection>, SqlFacadeError> {
        let object = self.pool.get().await?;
        Ok(Box::new(SqliteConnection::new(object)?))
    }

    async fn ping(&mut self) -> Result<(), SqlFacadeError> {
        self.with_conn(|conn| query::run_ping(conn)).await
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        self.pool.close();
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Sqlite
    }

    fn stats(&self) -> PoolStats {
        let status = self.pool.status();
        PoolStats {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    fn resize(&self, max_connections: usize) {
        self.pool.resize(max_connections);
    }
}
