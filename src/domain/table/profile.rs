// ============================================================
// TABLE PROFILE
// ============================================================
// Descriptive statistics computed over an ingested table

use serde::{Deserialize, Serialize};

use super::Table;

/// Every ingested cell is kept as text; type inference happens downstream.
pub const STRING_DTYPE: &str = "string";

/// Per-column counts shown in the global overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub missing_count: usize,
    pub unique_count: usize,
    /// Non-missing values that repeat an earlier value of the same column
    pub duplicate_count: usize,
}

/// Overview of a whole table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub preview: Table,
}

impl TableSummary {
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.columns.iter().map(|c| c.duplicate_count).sum()
    }
}

/// A value seen more than once in a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub occurrences: usize,
}

/// Drill-down on a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnExploration {
    pub name: String,
    pub dtype: String,
    pub unique_count: usize,
    pub missing_count: usize,
    /// Ordered by occurrences descending, then value
    pub duplicated_values: Vec<ValueCount>,
}
