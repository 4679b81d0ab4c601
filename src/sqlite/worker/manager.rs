use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use deadpool_sqlite::Object;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::types::TxBehavior;

use super::channel::Command;
use super::dispatcher::run_worker;

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(0);

/// Command-channel handle to the thread that owns one pooled connection.
///
/// A closed channel in either direction means the connection is gone, so
/// every channel failure surfaces as the closed-handle sentinel.
pub(crate) struct SqliteWorker {
    sender: Sender<Command>,
    worker_id: u64,
}

impl SqliteWorker {
    pub(crate) fn spawn(object: Object) -> Result<Self, SqlFacadeError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let worker_id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        // The pooled object is returned to the pool from this thread when
        // the loop exits; entering the runtime keeps that return path legal.
        let handle = Handle::try_current().ok();
        thread::Builder::new()
            .name(format!("sql-facade-sqlite-{worker_id}"))
            .spawn(move || {
                let runtime_guard = handle.as_ref().map(Handle::enter);
                run_worker(&object, &receiver);
                drop(runtime_guard);
            })
            .map_err(|err| {
                SqlFacadeError::ConnectionError(format!(
                    "failed to spawn SQLite worker thread: {err}"
                ))
            })?;
        tracing::debug!(worker_id, "spawned SQLite worker thread");

        Ok(Self { sender, worker_id })
    }

    pub(crate) fn worker_id(&self) -> u64 {
        self.worker_id
    }

    fn send_command(&self, command: Command) -> Result<(), SqlFacadeError> {
        self.sender
            .send(command)
            .map_err(|_| SqlFacadeError::ConnectionClosed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, SqlFacadeError>>) -> Command,
    ) -> Result<T, SqlFacadeError> {
        let (tx, rx) = oneshot::channel();
        self.send_command(build(tx))?;
        rx.await.map_err(|_| SqlFacadeError::ConnectionClosed)?
    }

    pub(crate) async fn batch(&self, script: String) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::Batch { script, respond_to })
            .await
    }

    pub(crate) async fn execute(
        &self,
        sql: String,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<ExecResult, SqlFacadeError> {
        self.request(|respond_to| Command::Execute {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn select(
        &self,
        sql: String,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<RowSet, SqlFacadeError> {
        self.request(|respond_to| Command::Select {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn select_row(
        &self,
        sql: String,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Row, SqlFacadeError> {
        self.request(|respond_to| Command::SelectRow {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn ping(&self) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::Ping { respond_to }).await
    }

    pub(crate) async fn prepare(&self, sql: Arc<String>) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::Prepare { sql, respond_to })
            .await
    }

    pub(crate) async fn prepared_execute(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<ExecResult, SqlFacadeError> {
        self.request(|respond_to| Command::PreparedExecute {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn prepared_select(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<RowSet, SqlFacadeError> {
        self.request(|respond_to| Command::PreparedSelect {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn prepared_select_row(
        &self,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Row, SqlFacadeError> {
        self.request(|respond_to| Command::PreparedSelectRow {
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn begin(&self, behavior: TxBehavior) -> Result<u64, SqlFacadeError> {
        self.request(|respond_to| Command::Begin {
            behavior,
            respond_to,
        })
        .await
    }

    pub(crate) async fn tx_batch(&self, tx_id: u64, script: String) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::TxBatch {
            tx_id,
            script,
            respond_to,
        })
        .await
    }

    pub(crate) async fn tx_execute(
        &self,
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<ExecResult, SqlFacadeError> {
        self.request(|respond_to| Command::TxExecute {
            tx_id,
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn tx_select(
        &self,
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<RowSet, SqlFacadeError> {
        self.request(|respond_to| Command::TxSelect {
            tx_id,
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn tx_select_row(
        &self,
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Row, SqlFacadeError> {
        self.request(|respond_to| Command::TxSelectRow {
            tx_id,
            sql,
            params,
            respond_to,
        })
        .await
    }

    pub(crate) async fn tx_prepare(&self, tx_id: u64, sql: Arc<String>) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::TxPrepare {
            tx_id,
            sql,
            respond_to,
        })
        .await
    }

    pub(crate) async fn commit(&self, tx_id: u64) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::Commit { tx_id, respond_to })
            .await
    }

    pub(crate) async fn rollback(&self, tx_id: u64) -> Result<(), SqlFacadeError> {
        self.request(|respond_to| Command::Rollback { tx_id, respond_to })
            .await
    }

    /// Fire-and-forget rollback, for drop paths that cannot await.
    pub(crate) fn rollback_nowait(&self, tx_id: u64) {
        let (respond_to, _discard) = oneshot::channel();
        let _ = self.sender.send(Command::Rollback { tx_id, respond_to });
    }

    /// Ask the worker to release the connection and exit. Requests already
    /// queued behind the shutdown are answered with the closed sentinel.
    pub(crate) fn shutdown(&self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}

impl Drop for SqliteWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}
