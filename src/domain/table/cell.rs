// ============================================================
// CELL VALUE
// ============================================================
// A table cell is either a recorded string or the missing marker

use serde::{Deserialize, Serialize};

/// Label shown wherever a missing cell has to be rendered as text
/// (filter choices, distinct value lists).
pub const MISSING_LABEL: &str = "(missing)";

/// One cell of an ingested table.
///
/// Ingestion never produces `Value("")`: empty strings are folded into
/// `Missing` so that a blank CSV field and an absent XML child look the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Value(String),
    Missing,
}

impl Cell {
    /// Build a cell from raw parsed text, collapsing the empty string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Cell::Missing
        } else {
            Cell::Value(raw)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Value(value) => Some(value),
            Cell::Missing => None,
        }
    }

    /// Text used by exports: missing cells become the empty string again.
    pub fn export_text(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// Text used by listings: missing cells are shown with [`MISSING_LABEL`].
    pub fn display_text(&self) -> &str {
        self.as_str().unwrap_or(MISSING_LABEL)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => Cell::from_raw(text),
            None => Cell::Missing,
        }
    }
}
