// ============================================================
// TABLE
// ============================================================
// Uniform row/column result of every ingestion path

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Cell;

/// One table row: column name to cell. Keys are always a subset of the
/// owning table's columns; an absent key reads as missing.
pub type Row = HashMap<String, Cell>;

static MISSING: Cell = Cell::Missing;

/// Ingested table with string-typed cells.
///
/// Column names are not guaranteed unique: a CSV header may repeat a name,
/// in which case the later column wins inside each row mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with a fixed column list
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a record given as ordered `(field, cell)` pairs.
    ///
    /// Unseen fields are appended to the column list in the order they
    /// appear; a field repeated inside one record keeps its last value.
    pub fn push_record<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (String, Cell)>,
    {
        let mut row = Row::new();
        for (name, cell) in fields {
            if !self.columns.iter().any(|c| c == &name) {
                self.columns.push(name.clone());
            }
            row.insert(name, cell);
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Cell at `(row, column)`; absent keys and out-of-range rows read as missing.
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&MISSING)
    }

    /// All cells of one column, in row order.
    pub fn column_cells<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&MISSING))
    }

    /// Cells of one row laid out in column order.
    pub fn row_cells(&self, row: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| self.cell(row, c)).collect()
    }

    /// First `n` rows, same columns.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows matching `predicate`, same columns, original order.
    pub fn select_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }
}
