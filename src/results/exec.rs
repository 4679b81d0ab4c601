/// Outcome of a mutating execution, captured from the driver at the moment
/// the statement ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    rows_affected: u64,
    last_insert_id: i64,
}

impl ExecResult {
    #[must_use]
    pub fn new(rows_affected: u64, last_insert_id: i64) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }

    /// Number of rows changed, inserted, or deleted by the statement.
    #[must_use]
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Rowid of the most recent successful insert on the connection.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }
}
