use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::SqlFacadeError;

/// Values that can be bound as query parameters or read back from a row.
///
/// This is the ordered, dynamically-typed slot used everywhere a variadic
/// argument or scan destination list would appear: callers pass `&[Value]`
/// in, and rows hand `Value`s back out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(v) = self { Some(v) } else { None }
    }

    /// Booleans round-trip through SQLite as 0/1 integers, so both
    /// representations answer here.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps stored as text are parsed back with the formats the
    /// facade itself writes.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(v) => Some(*v),
            Value::Text(s) => {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                    return Some(dt);
                }
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let Value::Blob(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let Value::Json(v) = self { Some(v) } else { None }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        Value::Json(v)
    }
}

// Nullable scalars are plain Options on the caller's side.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

fn scan_mismatch(expected: &str, got: &Value) -> SqlFacadeError {
    SqlFacadeError::ParameterError(format!("cannot scan {got:?} into {expected}"))
}

impl TryFrom<&Value> for i64 {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_int().ok_or_else(|| scan_mismatch("i64", v))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_float().ok_or_else(|| scan_mismatch("f64", v))
    }
}

impl TryFrom<&Value> for bool {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_bool().ok_or_else(|| scan_mismatch("bool", v))
    }
}

impl TryFrom<&Value> for String {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_text()
            .map(str::to_owned)
            .ok_or_else(|| scan_mismatch("String", v))
    }
}

impl TryFrom<&Value> for Vec<u8> {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_blob()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| scan_mismatch("Vec<u8>", v))
    }
}

impl TryFrom<&Value> for NaiveDateTime {
    type Error = SqlFacadeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        v.as_timestamp()
            .ok_or_else(|| scan_mismatch("NaiveDateTime", v))
    }
}

/// Identity of the driver backing a [`crate::Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    /// Pooled SQLite backend
    Sqlite,
    /// In-memory scripted mock backend
    Mock,
}

/// How the underlying library should start a transaction.
///
/// Mirrors the native SQLite transaction modes one-to-one; SQLite has no
/// server-style isolation ladder, so this enumeration is the whole of the
/// wrapped library's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxBehavior {
    /// Take locks lazily, on first use (SQLite's default)
    #[default]
    Deferred,
    /// Take a write lock immediately
    Immediate,
    /// Take an exclusive lock immediately
    Exclusive,
}

/// Options for beginning a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOptions {
    pub behavior: TxBehavior,
}

impl TxOptions {
    #[must_use]
    pub fn new(behavior: TxBehavior) -> Self {
        Self { behavior }
    }
}

/// Point-in-time snapshot of connection-pool statistics, passed through
/// from the pool unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolStats {
    /// Maximum number of connections the pool will open
    pub max_size: usize,
    /// Connections currently managed (idle plus in use)
    pub size: usize,
    /// Idle connections ready to be handed out
    pub available: usize,
    /// Callers currently waiting for a connection
    pub waiting: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accessor_accepts_integer_forms() {
        assert_eq!(Value::Int(1).as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Int(7).as_bool(), None);
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn timestamp_accessor_parses_text_forms() {
        let dt = Value::Text("2024-01-03 10:30:00".into()).as_timestamp().unwrap();
        assert_eq!(
            dt,
            NaiveDateTime::parse_from_str("2024-01-03 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
        let frac = Value::Text("2024-01-03 10:30:00.250".into()).as_timestamp();
        assert!(frac.is_some());
    }

    #[test]
    fn option_folds_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
    }

    #[test]
    fn typed_extraction_reports_mismatch() {
        let v = Value::Text("abc".into());
        assert_eq!(String::try_from(&v).unwrap(), "abc");
        assert!(i64::try_from(&v).is_err());
    }
}
