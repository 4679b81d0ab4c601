use crate::types::Value;

/// Convert a single facade value to a `SQLite` value.
#[must_use]
pub(crate) fn value_to_sqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Int(i) => rusqlite::types::Value::Integer(*i),
        Value::Float(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        Value::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        Value::Null => rusqlite::types::Value::Null,
        Value::Json(jval) => rusqlite::types::Value::Text(jval.to_string()),
        Value::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Convert a parameter slice into owned `SQLite` values that can cross to
/// the worker thread.
#[must_use]
pub(crate) fn convert_params(params: &[Value]) -> Vec<rusqlite::types::Value> {
    params.iter().map(value_to_sqlite).collect()
}

/// Build a borrowed params slice suitable for rusqlite execution.
#[must_use]
pub(crate) fn params_as_tosql(values: &[rusqlite::types::Value]) -> Vec<&dyn rusqlite::ToSql> {
    values.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
}
