//! Scripted in-memory driver implementing the facade traits.
//!
//! The mock exists so application code written against `dyn Database` can
//! run in tests with no real database: responses are scripted ahead of
//! time, every forwarded call is recorded for later assertion, and the
//! closed/finished sentinels behave exactly as the real backend's do.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::traits::{Connection, Database, Execute, Prepare, Query, Statement, Transaction};
use crate::types::{DatabaseKind, PoolStats, TxOptions, Value};

/// A canned response, consumed in FIFO order by execute/query calls.
#[derive(Debug)]
pub enum MockResponse {
    Exec(ExecResult),
    Rows(RowSet),
    Error(SqlFacadeError),
}

/// One call that reached the mock driver, in the order calls were made.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Which entity and operation was invoked, e.g. `"connection.execute"`.
    pub op: String,
    /// The SQL text forwarded, or an empty string for SQL-less operations.
    pub sql: String,
    /// The bound parameters forwarded.
    pub params: Vec<Value>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<MockResponse>,
    calls: Vec<RecordedCall>,
    closed: bool,
}

/// Shared scripting and recording handle for a mock driver instance.
///
/// Keep a clone next to the `Box<dyn Database>` under test: the handle
/// scripts responses before the exercise and inspects recorded calls after.
#[derive(Clone, Debug, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The database handle served by this driver.
    #[must_use]
    pub fn database(&self) -> MockDatabase {
        MockDatabase {
            driver: self.clone(),
        }
    }

    /// Script the next execute outcome.
    pub fn push_exec(&self, result: ExecResult) {
        self.lock().responses.push_back(MockResponse::Exec(result));
    }

    /// Script the next query result.
    pub fn push_rows(&self, rows: RowSet) {
        self.lock().responses.push_back(MockResponse::Rows(rows));
    }

    /// Script the next call to fail.
    pub fn push_error(&self, error: SqlFacadeError) {
        self.lock().responses.push_back(MockResponse::Error(error));
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, op: &str, sql: &str, params: &[Value]) -> Result<(), SqlFacadeError> {
        let mut state = self.lock();
        if state.closed {
            return Err(SqlFacadeError::ConnectionClosed);
        }
        state.calls.push(RecordedCall {
            op: op.to_owned(),
            sql: sql.to_owned(),
            params: params.to_vec(),
        });
        Ok(())
    }

    fn pop_exec(&self, op: &str) -> Result<ExecResult, SqlFacadeError> {
        match self.lock().responses.pop_front() {
            None => Ok(ExecResult::default()),
            Some(MockResponse::Exec(result)) => Ok(result),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Rows(_)) => Err(SqlFacadeError::ExecutionError(format!(
                "mock scripted a row set but {op} expected an execute outcome"
            ))),
        }
    }

    fn pop_rows(&self, op: &str) -> Result<RowSet, SqlFacadeError> {
        match self.lock().responses.pop_front() {
            None => Ok(RowSet::default()),
            Some(MockResponse::Rows(rows)) => Ok(rows),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Exec(_)) => Err(SqlFacadeError::ExecutionError(format!(
                "mock scripted an execute outcome but {op} expected rows"
            ))),
        }
    }

    fn execute(&self, op: &str, sql: &str, params: &[Value]) -> Result<ExecResult, SqlFacadeError> {
        self.record(op, sql, params)?;
        self.pop_exec(op)
    }

    fn batch(&self, op: &str, script: &str) -> Result<(), SqlFacadeError> {
        self.record(op, script, &[])?;
        let mut state = self.lock();
        if matches!(state.responses.front(), Some(MockResponse::Error(_))) {
            if let Some(MockResponse::Error(err)) = state.responses.pop_front() {
                return Err(err);
            }
        }
        Ok(())
    }

    fn query(&self, op: &str, sql: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.record(op, sql, params)?;
        self.pop_rows(op)
    }

    fn query_row(&self, op: &str, sql: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.query(op, sql, params)?
            .take_first_row()
            .ok_or(SqlFacadeError::NoRows)
    }

    fn check_open(&self) -> Result<(), SqlFacadeError> {
        if self.lock().closed {
            Err(SqlFacadeError::ConnectionClosed)
        } else {
            Ok(())
        }
    }
}

/// Mock database handle.
#[derive(Clone, Debug)]
pub struct MockDatabase {
    driver: MockDriver,
}

#[async_trait]
impl Execute for MockDatabase {
    async fn execute(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        self.driver.execute("database.execute", query, params)
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        self.driver.batch("database.execute_batch", script)
    }
}

#[async_trait]
impl Prepare for MockDatabase {
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        self.driver.record("database.prepare", query, &[])?;
        Ok(Box::new(MockStatement {
            driver: self.driver.clone(),
            sql: query.to_owned(),
            closed: false,
        }))
    }
}

#[async_trait]
impl Query for MockDatabase {
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.driver.query("database.query", query, params)
    }

    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.driver.query_row("database.query_row", query, params)
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn begin_with(&mut self, _opts: TxOptions) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        self.driver.record("database.begin", "", &[])?;
        Ok(Box::new(MockTransaction {
            driver: self.driver.clone(),
            finished: false,
        }))
    }

    async fn connection(&mut self) -> Result<Box<dyn Connection>, SqlFacadeError> {
        self.driver.record("database.connection", "", &[])?;
        Ok(Box::new(MockConnection {
            driver: self.driver.clone(),
            closed: false,
        }))
    }

    async fn ping(&mut self) -> Result<(), SqlFacadeError> {
        self.driver.check_open()
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        self.driver.lock().closed = true;
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Mock
    }

    fn stats(&self) -> PoolStats {
        PoolStats {
            max_size: 1,
            size: 1,
            available: 1,
            waiting: 0,
        }
    }

    fn resize(&self, _max_connections: usize) {}
}

/// Mock reserved connection.
#[derive(Clone, Debug)]
pub struct MockConnection {
    driver: MockDriver,
    closed: bool,
}

impl MockConnection {
    fn check_open(&self) -> Result<(), SqlFacadeError> {
        if self.closed {
            return Err(SqlFacadeError::ConnectionClosed);
        }
        self.driver.check_open()
    }
}

#[async_trait]
impl Execute for MockConnection {
    async fn execute(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        self.check_open()?;
        self.driver.execute("connection.execute", query, params)
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        self.check_open()?;
        self.driver.batch("connection.execute_batch", script)
    }
}

#[async_trait]
impl Prepare for MockConnection {
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        self.check_open()?;
        self.driver.record("connection.prepare", query, &[])?;
        Ok(Box::new(MockStatement {
            driver: self.driver.clone(),
            sql: query.to_owned(),
            closed: false,
        }))
    }
}

#[async_trait]
impl Query for MockConnection {
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.check_open()?;
        self.driver.query("connection.query", query, params)
    }

    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.check_open()?;
        self.driver.query_row("connection.query_row", query, params)
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn begin_with(&mut self, _opts: TxOptions) -> Result<Box<dyn Transaction>, SqlFacadeError> {
        self.check_open()?;
        self.driver.record("connection.begin", "", &[])?;
        Ok(Box::new(MockTransaction {
            driver: self.driver.clone(),
            finished: false,
        }))
    }

    async fn ping(&mut self) -> Result<(), SqlFacadeError> {
        self.check_open()
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        self.closed = true;
        Ok(())
    }
}

/// Mock transaction with real finished-state semantics.
#[derive(Clone, Debug)]
pub struct MockTransaction {
    driver: MockDriver,
    finished: bool,
}

impl MockTransaction {
    fn live(&self) -> Result<(), SqlFacadeError> {
        if self.finished {
            return Err(SqlFacadeError::TransactionFinished);
        }
        self.driver.check_open()
    }
}

#[async_trait]
impl Execute for MockTransaction {
    async fn execute(
        &mut self,
        query: &str,
        params: &[Value],
    ) -> Result<ExecResult, SqlFacadeError> {
        self.live()?;
        self.driver.execute("transaction.execute", query, params)
    }

    async fn execute_batch(&mut self, script: &str) -> Result<(), SqlFacadeError> {
        self.live()?;
        self.driver.batch("transaction.execute_batch", script)
    }
}

#[async_trait]
impl Prepare for MockTransaction {
    async fn prepare(&mut self, query: &str) -> Result<Box<dyn Statement>, SqlFacadeError> {
        self.live()?;
        self.driver.record("transaction.prepare", query, &[])?;
        Ok(Box::new(MockStatement {
            driver: self.driver.clone(),
            sql: query.to_owned(),
            closed: false,
        }))
    }
}

#[async_trait]
impl Query for MockTransaction {
    async fn query(&mut self, query: &str, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.live()?;
        self.driver.query("transaction.query", query, params)
    }

    async fn query_row(&mut self, query: &str, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.live()?;
        self.driver.query_row("transaction.query_row", query, params)
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(&mut self) -> Result<(), SqlFacadeError> {
        self.live()?;
        self.driver.record("transaction.commit", "", &[])?;
        self.finished = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SqlFacadeError> {
        self.live()?;
        self.driver.record("transaction.rollback", "", &[])?;
        self.finished = true;
        Ok(())
    }

    async fn statement(
        &mut self,
        stmt: &dyn Statement,
    ) -> Result<Box<dyn Statement>, SqlFacadeError> {
        self.prepare(stmt.sql()).await
    }
}

/// Mock prepared statement.
#[derive(Clone, Debug)]
pub struct MockStatement {
    driver: MockDriver,
    sql: String,
    closed: bool,
}

impl MockStatement {
    fn live(&self) -> Result<(), SqlFacadeError> {
        if self.closed {
            return Err(SqlFacadeError::ExecutionError(
                "prepared statement already closed".into(),
            ));
        }
        self.driver.check_open()
    }
}

#[async_trait]
impl Statement for MockStatement {
    async fn execute(&mut self, params: &[Value]) -> Result<ExecResult, SqlFacadeError> {
        self.live()?;
        self.driver.execute("statement.execute", &self.sql, params)
    }

    async fn query(&mut self, params: &[Value]) -> Result<RowSet, SqlFacadeError> {
        self.live()?;
        self.driver.query("statement.query", &self.sql, params)
    }

    async fn query_row(&mut self, params: &[Value]) -> Result<Row, SqlFacadeError> {
        self.live()?;
        self.driver.query_row("statement.query_row", &self.sql, params)
    }

    async fn close(&mut self) -> Result<(), SqlFacadeError> {
        self.closed = true;
        Ok(())
    }

    fn sql(&self) -> &str {
        &self.sql
    }
}
