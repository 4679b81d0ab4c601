use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Value;

/// A single row from a query result.
///
/// Column names and the name-to-index map are shared across every row of
/// the originating [`super::RowSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(
        columns: Arc<Vec<String>>,
        index: Arc<HashMap<String, usize>>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            columns,
            index,
            values,
        }
    }

    /// Column names for this row.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values, in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Index of a column by name, or `None` if the result has no such column.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Value of a column by name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.column_index(column).and_then(|i| self.values.get(i))
    }

    /// Value of a column by position.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}
