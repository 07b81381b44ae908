// ============================================================
// VALUE FILTER
// ============================================================
// Row selection by membership of one column's value in a chosen set

use serde::{Deserialize, Serialize};

use super::{Cell, MISSING_LABEL};

/// One selectable value. `Missing` selects rows whose cell is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Value(String),
    Missing,
}

impl FilterValue {
    /// Map a user-facing label back to a filter value; the missing label
    /// selects missing cells.
    pub fn from_label(label: &str) -> Self {
        if label == MISSING_LABEL {
            FilterValue::Missing
        } else {
            FilterValue::Value(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FilterValue::Value(value) => value,
            FilterValue::Missing => MISSING_LABEL,
        }
    }

    pub fn matches(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (FilterValue::Value(wanted), Cell::Value(actual)) => wanted == actual,
            (FilterValue::Missing, Cell::Missing) => true,
            _ => false,
        }
    }
}

impl From<&Cell> for FilterValue {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Value(value) => FilterValue::Value(value.clone()),
            Cell::Missing => FilterValue::Missing,
        }
    }
}

/// Keep rows whose `column` holds one of `selected`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFilter {
    pub column: String,
    pub selected: Vec<FilterValue>,
}

impl ValueFilter {
    pub fn new(column: impl Into<String>, selected: Vec<FilterValue>) -> Self {
        Self {
            column: column.into(),
            selected,
        }
    }

    /// A filter with nothing selected leaves the table untouched
    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn includes_missing(&self) -> bool {
        self.selected.contains(&FilterValue::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_label_round_trip() {
        assert_eq!(FilterValue::from_label(MISSING_LABEL), FilterValue::Missing);
        assert_eq!(FilterValue::Missing.label(), MISSING_LABEL);
        assert_eq!(
            FilterValue::from_label("Acme"),
            FilterValue::Value("Acme".to_string())
        );
    }

    #[test]
    fn test_matches() {
        let acme = FilterValue::Value("Acme".to_string());
        assert!(acme.matches(&Cell::Value("Acme".to_string())));
        assert!(!acme.matches(&Cell::Missing));
        assert!(FilterValue::Missing.matches(&Cell::Missing));
    }

    #[test]
    fn test_empty_selection_is_inactive() {
        let filter = ValueFilter::new("brand", Vec::new());
        assert!(!filter.is_active());
        assert!(!filter.includes_missing());
    }
}
