use crate::cell::CellValue;
use serde::{Deserialize, Serialize};

/// A single row of cells.
pub type Row = Vec<CellValue>;

static NULL: CellValue = CellValue::Null;

/// A table representing a 2D grid of cells (row-major storage).
///
/// Rows are allowed to have different lengths; accessors treat positions
/// past the end of a short row as [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table
    #[must_use]
    pub fn new() -> Self {
        Table { rows: Vec::new() }
    }

    /// Create a table from rows of cells
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    /// Create a table from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Table { rows }
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns, i.e. the length of the longest row
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row and column index (0-based).
    ///
    /// Out-of-range positions read as null rather than panicking, so ragged
    /// tables can be traversed uniformly.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }

    /// Get the rows as a slice
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get mutable access to the rows
    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    /// Consume the table, returning its rows
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Clone the first `n` rows
    #[must_use]
    pub fn preview(&self, n: usize) -> Vec<Row> {
        self.rows.iter().take(n).cloned().collect()
    }
}
