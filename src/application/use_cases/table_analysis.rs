// ============================================================
// TABLE ANALYSIS USE CASE
// ============================================================
// Shape, missing values and duplicates of an ingested table

use std::collections::{HashMap, HashSet};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{
    ColumnExploration, ColumnProfile, Table, TableSummary, ValueCount, STRING_DTYPE,
};

/// Table analysis use case
pub struct TableAnalyzer {
    preview_rows: usize,
}

impl TableAnalyzer {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Global overview: shape, per-column counts and a preview
    pub fn summarize(&self, table: &Table) -> TableSummary {
        TableSummary {
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns: table
                .columns
                .iter()
                .map(|column| Self::profile_column(table, column))
                .collect(),
            preview: table.head(self.preview_rows),
        }
    }

    /// Drill-down on one column: counts plus every value seen more than once
    pub fn explore_column(&self, table: &Table, column: &str) -> Result<ColumnExploration> {
        if !table.has_column(column) {
            return Err(AppError::NotFound(format!("column '{}'", column)));
        }

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut missing_count = 0usize;
        for cell in table.column_cells(column) {
            match cell.as_str() {
                Some(value) => *occurrences.entry(value).or_insert(0) += 1,
                None => missing_count += 1,
            }
        }

        let unique_count = occurrences.len();
        let mut duplicated_values: Vec<ValueCount> = occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(value, occurrences)| ValueCount {
                value: value.to_string(),
                occurrences,
            })
            .collect();
        duplicated_values.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.value.cmp(&b.value))
        });

        Ok(ColumnExploration {
            name: column.to_string(),
            dtype: STRING_DTYPE.to_string(),
            unique_count,
            missing_count,
            duplicated_values,
        })
    }

    fn profile_column(table: &Table, column: &str) -> ColumnProfile {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut missing_count = 0usize;
        let mut present_count = 0usize;

        for cell in table.column_cells(column) {
            match cell.as_str() {
                Some(value) => {
                    present_count += 1;
                    seen.insert(value);
                }
                None => missing_count += 1,
            }
        }

        ColumnProfile {
            name: column.to_string(),
            dtype: STRING_DTYPE.to_string(),
            missing_count,
            unique_count: seen.len(),
            duplicate_count: present_count - seen.len(),
        }
    }
}

impl Default for TableAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}
