//! Untyped table as read from a CSV export.

use crate::error::{DataError, Result};

/// Headers plus string cells, one `Vec<String>` per row.
///
/// Rows are normalized to the header width on construction: short rows are
/// padded with empty cells and extra cells are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, normalizing every row to `headers.len()` cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor for literals (mostly tests).
    pub fn from_str_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Column headers in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Cells of a column that must exist.
    pub fn required_column(&self, name: &str) -> Result<Vec<&str>> {
        self.column(name).ok_or_else(|| self.schema_error(name))
    }

    /// Fail with [`DataError::Schema`] on the first missing column.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(self.schema_error(missing)),
            None => Ok(()),
        }
    }

    /// Rename headers according to `(from, to)` pairs. Unknown headers are kept.
    pub fn rename_columns(&mut self, mapping: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, to)) = mapping.iter().find(|(from, _)| header == from) {
                *header = to.to_string();
            }
        }
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn schema_error(&self, column: &str) -> DataError {
        DataError::Schema {
            column: column.to_string(),
            available: self.headers.clone(),
        }
    }
}
