/// Metadata for a single result column, read off the prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    name: String,
    decl_type: Option<String>,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, decl_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            decl_type: decl_type.map(str::to_owned),
        }
    }

    /// Column name (or alias) as reported by the driver.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared database type, when the schema declares one.
    ///
    /// Expression columns carry no declaration; SQLite reports those as
    /// `None` and the facade passes that through.
    #[must_use]
    pub fn decl_type(&self) -> Option<&str> {
        self.decl_type.as_deref()
    }
}
