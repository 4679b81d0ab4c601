use std::collections::HashMap;
use std::sync::Arc;

use super::column::ColumnInfo;
use super::row::Row;
use crate::types::Value;

/// The materialized result of a query, with a forward-only cursor.
///
/// The backend drains the driver's cursor on its worker thread (the driver
/// row handle cannot cross threads), so by the time callers see a `RowSet`
/// the cursor lifecycle is already settled and rows can also be inspected
/// by index via [`RowSet::rows`].
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
    column_info: Vec<ColumnInfo>,
    rows: Vec<Row>,
    cursor: usize,
}

impl RowSet {
    /// Create an empty result set with the given column names.
    ///
    /// Column metadata defaults to name-only entries; backends that know
    /// declared types attach them with [`RowSet::set_column_info`].
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        let column_info = columns
            .iter()
            .map(|name| ColumnInfo::new(name.clone(), None))
            .collect();
        let index = Arc::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self {
            columns: Arc::new(columns),
            index,
            column_info,
            rows: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the per-column metadata (same order as `columns`).
    pub fn set_column_info(&mut self, column_info: Vec<ColumnInfo>) {
        self.column_info = column_info;
    }

    /// Append a row of values, in column order.
    pub fn push_row(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(Row::new(
            Arc::clone(&self.columns),
            Arc::clone(&self.index),
            values,
        ));
    }

    /// Column names of the result.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column metadata of the result.
    #[must_use]
    pub fn column_info(&self) -> &[ColumnInfo] {
        &self.column_info
    }

    /// All rows, for random access.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Advance the cursor and return the next row, or `None` once the
    /// result is exhausted.
    pub fn next_row(&mut self) -> Option<&Row> {
        let row = self.rows.get(self.cursor);
        if row.is_some() {
            self.cursor += 1;
        }
        row
    }

    pub(crate) fn take_first_row(mut self) -> Option<Row> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.rows.swap_remove(0))
        }
    }
}
