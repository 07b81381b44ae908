// ============================================================
// TABLE FILTER USE CASE
// ============================================================
// Select rows by the values of one column, missing included

use std::collections::HashSet;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{FilterValue, Table, ValueFilter};

pub struct TableFilter;

impl TableFilter {
    /// Distinct values of `column` in first-seen order; missing appears once
    /// as [`FilterValue::Missing`].
    pub fn distinct_values(table: &Table, column: &str) -> Result<Vec<FilterValue>> {
        Self::ensure_column(table, column)?;

        let mut seen: HashSet<FilterValue> = HashSet::new();
        let mut values = Vec::new();
        for cell in table.column_cells(column) {
            let value = FilterValue::from(cell);
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Rows matching a selected value, in table order, followed by the rows
    /// whose cell is missing when missing is selected. An empty selection
    /// returns the table unchanged.
    pub fn apply(table: &Table, filter: &ValueFilter) -> Result<Table> {
        Self::ensure_column(table, &filter.column)?;

        if !filter.is_active() {
            return Ok(table.clone());
        }

        let wanted: Vec<&FilterValue> = filter
            .selected
            .iter()
            .filter(|v| !matches!(v, FilterValue::Missing))
            .collect();

        let mut result = table.select_rows(|row| match row.get(&filter.column) {
            Some(cell) => wanted.iter().any(|v| v.matches(cell)),
            None => false,
        });

        if filter.includes_missing() {
            let missing = table.select_rows(|row| {
                row.get(&filter.column).map_or(true, |cell| cell.is_missing())
            });
            result.rows.extend(missing.rows);
        }

        Ok(result)
    }

    fn ensure_column(table: &Table, column: &str) -> Result<()> {
        if table.has_column(column) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("column '{}'", column)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    fn table() -> Table {
        let mut table = Table::default();
        for (brand, id) in [(Some("Acme"), "1"), (None, "2"), (Some("Globex"), "3"), (Some("Acme"), "4")] {
            table.push_record(vec![
                ("id".to_string(), Cell::from_raw(id)),
                ("brand".to_string(), Cell::from(brand.map(str::to_string))),
            ]);
        }
        // Row without the brand key at all
        table.push_record(vec![("id".to_string(), Cell::from_raw("5"))]);
        table
    }

    fn ids(table: &Table) -> Vec<&str> {
        table.column_cells("id").filter_map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_distinct_values_first_seen() {
        let values = TableFilter::distinct_values(&table(), "brand").unwrap();
        assert_eq!(
            values,
            vec![
                FilterValue::Value("Acme".to_string()),
                FilterValue::Missing,
                FilterValue::Value("Globex".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_by_value() {
        let filter = ValueFilter::new("brand", vec![FilterValue::Value("Acme".to_string())]);
        let result = TableFilter::apply(&table(), &filter).unwrap();
        assert_eq!(ids(&result), vec!["1", "4"]);
        assert_eq!(result.columns, table().columns);
    }

    #[test]
    fn test_missing_rows_appended_after_matches() {
        let filter = ValueFilter::new(
            "brand",
            vec![FilterValue::Missing, FilterValue::Value("Globex".to_string())],
        );
        let result = TableFilter::apply(&table(), &filter).unwrap();
        assert_eq!(ids(&result), vec!["3", "2", "5"]);
    }

    #[test]
    fn test_empty_selection_keeps_everything() {
        let filter = ValueFilter::new("brand", Vec::new());
        assert_eq!(TableFilter::apply(&table(), &filter).unwrap(), table());
    }

    #[test]
    fn test_unknown_column() {
        let filter = ValueFilter::new("color", vec![FilterValue::Missing]);
        assert!(matches!(
            TableFilter::apply(&table(), &filter),
            Err(AppError::NotFound(_))
        ));
    }
}
