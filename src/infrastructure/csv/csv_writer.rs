// ============================================================
// CSV WRITER
// ============================================================
// Serialize a table back to delimited UTF-8 text

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Writes the header row followed by every row in column order.
/// Missing cells are written as empty fields.
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn write_table(&self, table: &Table) -> Result<Vec<u8>> {
        if table.columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer
            .write_record(&table.columns)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

        for index in 0..table.row_count() {
            let cells = table.row_cells(index);
            writer
                .write_record(cells.iter().map(|cell| cell.export_text()))
                .map_err(|e| {
                    AppError::Internal(format!("Failed to write CSV row {}: {}", index + 1, e))
                })?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    #[test]
    fn test_missing_cells_written_empty() {
        let mut table = Table::default();
        table.push_record(vec![
            ("a".to_string(), Cell::from_raw("1")),
            ("b".to_string(), Cell::Missing),
        ]);
        table.push_record(vec![("b".to_string(), Cell::from_raw("x,y"))]);

        let bytes = CsvWriter::new().write_table(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b\n1,\n,\"x,y\"\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut table = Table::default();
        table.push_record(vec![("a".to_string(), Cell::from_raw("1")), ("b".to_string(), Cell::from_raw("2"))]);

        let bytes = CsvWriter::new().with_delimiter(b'|').write_table(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a|b\n1|2\n");
    }

    #[test]
    fn test_table_without_columns_writes_nothing() {
        assert!(CsvWriter::new().write_table(&Table::default()).unwrap().is_empty());
    }
}
