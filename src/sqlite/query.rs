//! Synchronous helpers that drive rusqlite on whichever thread currently
//! owns the connection (a pool interact closure or the worker loop).

use crate::error::SqlFacadeError;
use crate::results::{ColumnInfo, ExecResult, Row, RowSet};
use crate::types::Value;

use super::params::params_as_tosql;

fn value_from_row(row: &rusqlite::Row<'_>, idx: usize) -> Result<Value, SqlFacadeError> {
    let value: rusqlite::types::Value = row.get(idx)?;
    Ok(match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Int(i),
        rusqlite::types::Value::Real(f) => Value::Float(f),
        rusqlite::types::Value::Text(s) => Value::Text(s),
        rusqlite::types::Value::Blob(b) => Value::Blob(b),
    })
}

/// Drain a prepared statement's cursor into an owned [`RowSet`].
pub(crate) fn build_row_set(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[rusqlite::types::Value],
) -> Result<RowSet, SqlFacadeError> {
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_info: Vec<ColumnInfo> = stmt
        .columns()
        .iter()
        .map(|c| ColumnInfo::new(c.name(), c.decl_type()))
        .collect();
    let col_count = columns.len();

    let mut set = RowSet::new(columns);
    set.set_column_info(column_info);

    let param_refs = params_as_tosql(params);
    let mut rows = stmt.query(&param_refs[..])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(value_from_row(row, i)?);
        }
        set.push_row(values);
    }
    Ok(set)
}

fn exec_statement(
    conn: &rusqlite::Connection,
    stmt: &mut rusqlite::Statement<'_>,
    params: &[rusqlite::types::Value],
) -> Result<ExecResult, SqlFacadeError> {
    let param_refs = params_as_tosql(params);
    let rows = stmt.execute(&param_refs[..])?;
    Ok(ExecResult::new(rows as u64, conn.last_insert_rowid()))
}

pub(crate) fn run_batch(conn: &rusqlite::Connection, script: &str) -> Result<(), SqlFacadeError> {
    conn.execute_batch(script)?;
    Ok(())
}

pub(crate) fn run_execute(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<ExecResult, SqlFacadeError> {
    let mut stmt = conn.prepare(sql)?;
    exec_statement(conn, &mut stmt, params)
}

pub(crate) fn run_execute_cached(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<ExecResult, SqlFacadeError> {
    let mut stmt = conn.prepare_cached(sql)?;
    exec_statement(conn, &mut stmt, params)
}

pub(crate) fn run_select(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<RowSet, SqlFacadeError> {
    let mut stmt = conn.prepare(sql)?;
    build_row_set(&mut stmt, params)
}

pub(crate) fn run_select_cached(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<RowSet, SqlFacadeError> {
    let mut stmt = conn.prepare_cached(sql)?;
    build_row_set(&mut stmt, params)
}

pub(crate) fn run_select_row(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<Row, SqlFacadeError> {
    run_select(conn, sql, params)?
        .take_first_row()
        .ok_or(SqlFacadeError::NoRows)
}

pub(crate) fn run_select_row_cached(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[rusqlite::types::Value],
) -> Result<Row, SqlFacadeError> {
    run_select_cached(conn, sql, params)?
        .take_first_row()
        .ok_or(SqlFacadeError::NoRows)
}

/// Compile (and cache) a statement so bad SQL surfaces at prepare time.
pub(crate) fn validate_cached(
    conn: &rusqlite::Connection,
    sql: &str,
) -> Result<(), SqlFacadeError> {
    let _ = conn.prepare_cached(sql)?;
    Ok(())
}

pub(crate) fn run_ping(conn: &rusqlite::Connection) -> Result<(), SqlFacadeError> {
    conn.query_row("SELECT 1", [], |_| Ok(()))?;
    Ok(())
}
