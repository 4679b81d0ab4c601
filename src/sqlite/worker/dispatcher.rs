use std::sync::mpsc::Receiver;

use deadpool_sqlite::Object;

use crate::error::SqlFacadeError;
use crate::sqlite::query;
use crate::types::TxBehavior;

use super::channel::Command;

fn behavior_to_native(behavior: TxBehavior) -> rusqlite::TransactionBehavior {
    match behavior {
        TxBehavior::Deferred => rusqlite::TransactionBehavior::Deferred,
        TxBehavior::Immediate => rusqlite::TransactionBehavior::Immediate,
        TxBehavior::Exclusive => rusqlite::TransactionBehavior::Exclusive,
    }
}

pub(super) fn run_worker(object: &Object, receiver: &Receiver<Command>) {
    let mut conn_guard = match object.lock() {
        Ok(guard) => guard,
        Err(err) => {
            tracing::error!("SQLite connection mutex poisoned: {err}");
            return;
        }
    };

    // Transaction IDs never leave this thread; u64 won't exhaust in practice.
    let mut next_tx_id: u64 = 1;

    while let Ok(command) = receiver.recv() {
        match command {
            Command::Shutdown => break,
            Command::Begin {
                behavior,
                respond_to,
            } => match conn_guard.transaction_with_behavior(behavior_to_native(behavior)) {
                Ok(tx) => {
                    let tx_id = next_tx_id;
                    next_tx_id = next_tx_id.saturating_add(1);
                    let _ = respond_to.send(Ok(tx_id));
                    // The rusqlite::Transaction is !Send, so it stays on this
                    // thread; commands are routed here by tx_id until we see
                    // Commit/Rollback.
                    if !run_tx_loop(tx_id, tx, receiver) {
                        break;
                    }
                }
                Err(err) => {
                    let _ = respond_to.send(Err(err.into()));
                }
            },
            Command::Batch { script, respond_to } => {
                let _ = respond_to.send(query::run_batch(&conn_guard, &script));
            }
            Command::Execute {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_execute(&conn_guard, &sql, &params));
            }
            Command::Select {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_select(&conn_guard, &sql, &params));
            }
            Command::SelectRow {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_select_row(&conn_guard, &sql, &params));
            }
            Command::Ping { respond_to } => {
                let _ = respond_to.send(query::run_ping(&conn_guard));
            }
            Command::Prepare { sql, respond_to } => {
                let _ = respond_to.send(query::validate_cached(&conn_guard, &sql));
            }
            Command::PreparedExecute {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_execute_cached(&conn_guard, &sql, &params));
            }
            Command::PreparedSelect {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_select_cached(&conn_guard, &sql, &params));
            }
            Command::PreparedSelectRow {
                sql,
                params,
                respond_to,
            } => {
                let _ = respond_to.send(query::run_select_row_cached(&conn_guard, &sql, &params));
            }
            // A transaction-scoped command with no open transaction means
            // that transaction has already finished.
            Command::TxBatch { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::TxExecute { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::TxSelect { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::TxSelectRow { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::TxPrepare { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::Commit { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
            Command::Rollback { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
            }
        }
    }
    tracing::debug!("SQLite worker thread shutting down");
}

/// Serve transaction-scoped commands until commit, rollback, or shutdown.
/// Returns false when the worker should exit entirely.
fn run_tx_loop(tx_id: u64, tx: rusqlite::Transaction<'_>, receiver: &Receiver<Command>) -> bool {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::TxBatch {
                tx_id: id,
                script,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let _ = respond_to.send(query::run_batch(&tx, &script));
            }
            Command::TxExecute {
                tx_id: id,
                sql,
                params,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let _ = respond_to.send(query::run_execute_cached(&tx, &sql, &params));
            }
            Command::TxSelect {
                tx_id: id,
                sql,
                params,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let _ = respond_to.send(query::run_select_cached(&tx, &sql, &params));
            }
            Command::TxSelectRow {
                tx_id: id,
                sql,
                params,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let _ = respond_to.send(query::run_select_row_cached(&tx, &sql, &params));
            }
            Command::TxPrepare {
                tx_id: id,
                sql,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let _ = respond_to.send(query::validate_cached(&tx, &sql));
            }
            Command::Commit {
                tx_id: id,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let res = tx.commit().map_err(SqlFacadeError::from);
                let _ = respond_to.send(res);
                return true;
            }
            Command::Rollback {
                tx_id: id,
                respond_to,
            } => {
                if id != tx_id {
                    let _ = respond_to.send(Err(SqlFacadeError::TransactionFinished));
                    continue;
                }
                let res = tx.rollback().map_err(SqlFacadeError::from);
                let _ = respond_to.send(res);
                return true;
            }
            // Dropping the transaction on shutdown rolls it back.
            Command::Shutdown => return false,
            // Connection-scoped work is blocked while a transaction holds
            // the connection.
            Command::Begin { respond_to, .. } => {
                let _ = respond_to.send(Err(SqlFacadeError::ExecutionError(
                    "SQLite transaction already in progress".into(),
                )));
            }
            Command::Batch { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::Execute { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::Select { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::SelectRow { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::Ping { respond_to } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::Prepare { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::PreparedExecute { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::PreparedSelect { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
            Command::PreparedSelectRow { respond_to, .. } => {
                let _ = respond_to.send(Err(tx_in_progress()));
            }
        }
    }
    false
}

fn tx_in_progress() -> SqlFacadeError {
    SqlFacadeError::ExecutionError(
        "SQLite transaction in progress; operation not permitted".into(),
    )
}
