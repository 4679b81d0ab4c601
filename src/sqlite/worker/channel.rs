use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::SqlFacadeError;
use crate::results::{ExecResult, Row, RowSet};
use crate::types::TxBehavior;

pub(super) type Reply<T> = oneshot::Sender<Result<T, SqlFacadeError>>;

pub(super) enum Command {
    Batch {
        script: String,
        respond_to: Reply<()>,
    },
    Execute {
        sql: String,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<ExecResult>,
    },
    Select {
        sql: String,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<RowSet>,
    },
    SelectRow {
        sql: String,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<Row>,
    },
    Ping {
        respond_to: Reply<()>,
    },
    Prepare {
        sql: Arc<String>,
        respond_to: Reply<()>,
    },
    PreparedExecute {
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<ExecResult>,
    },
    PreparedSelect {
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<RowSet>,
    },
    PreparedSelectRow {
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<Row>,
    },
    Begin {
        behavior: TxBehavior,
        respond_to: Reply<u64>,
    },
    TxBatch {
        tx_id: u64,
        script: String,
        respond_to: Reply<()>,
    },
    TxExecute {
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<ExecResult>,
    },
    TxSelect {
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<RowSet>,
    },
    TxSelectRow {
        tx_id: u64,
        sql: Arc<String>,
        params: Vec<rusqlite::types::Value>,
        respond_to: Reply<Row>,
    },
    TxPrepare {
        tx_id: u64,
        sql: Arc<String>,
        respond_to: Reply<()>,
    },
    Commit {
        tx_id: u64,
        respond_to: Reply<()>,
    },
    Rollback {
        tx_id: u64,
        respond_to: Reply<()>,
    },
    Shutdown,
}
