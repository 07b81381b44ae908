// ============================================================
// XML INGESTION USE CASE
// ============================================================
// Parse, locate the repeating records and flatten them into a table

use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::source::XmlNode;
use crate::domain::table::{Cell, Table};
use crate::infrastructure::xml::{locate_record_group, XmlTreeParser};

/// Result of a lenient XML ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct XmlIngestion {
    pub table: Table,
    /// Set when the document could not be parsed or has no repeating
    /// structure; the table is empty in that case.
    pub warning: Option<AppError>,
}

/// XML ingestion use case
#[derive(Default)]
pub struct XmlIngestor;

impl XmlIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Lenient ingestion: structural problems produce an empty table and a
    /// warning instead of an error.
    pub fn ingest(&self, bytes: &[u8]) -> XmlIngestion {
        match self.ingest_strict(bytes) {
            Ok(table) => XmlIngestion {
                table,
                warning: None,
            },
            Err(error) => {
                warn!(error = %error, "XML ingestion produced no records");
                XmlIngestion {
                    table: Table::default(),
                    warning: Some(error),
                }
            }
        }
    }

    /// Strict ingestion: malformed documents and documents without a
    /// repeating structure are errors.
    pub fn ingest_strict(&self, bytes: &[u8]) -> Result<Table> {
        let root = XmlTreeParser::parse(bytes)?;

        let records = locate_record_group(&root).ok_or(AppError::NoRepeatingStructure)?;
        info!(
            tag = %records[0].tag,
            records = records.len(),
            "located repeating XML records"
        );

        let table = Self::flatten(&records);
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "XML ingestion complete"
        );
        Ok(table)
    }

    /// One row per record; one column per distinct child local name, in
    /// first-seen order across records. Grandchildren and attributes are
    /// not captured.
    pub fn flatten(records: &[&XmlNode]) -> Table {
        let mut table = Table::default();
        for record in records {
            table.push_record(
                record
                    .children
                    .iter()
                    .map(|field| (field.local_name.clone(), Cell::from(field.text.clone()))),
            );
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog xmlns:p="urn:products">
  <info><source>feed</source></info>
  <products>
    <p:product><p:sku>A1</p:sku><p:brand>Acme</p:brand></p:product>
    <p:product><p:sku>B2</p:sku><p:price>9.90</p:price></p:product>
    <p:product><p:sku>C3</p:sku><p:brand/><p:price>1.00</p:price></p:product>
  </products>
</catalog>"#;

    #[test]
    fn test_simple_records() {
        let xml = b"<root><item><x>1</x></item><item><x>2</x></item><other/></root>";
        let table = XmlIngestor::new().ingest_strict(xml).unwrap();

        assert_eq!(table.columns, vec!["x"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "x"), &Cell::from_raw("1"));
        assert_eq!(table.cell(1, "x"), &Cell::from_raw("2"));
    }

    #[test]
    fn test_union_of_fields_with_missing_cells() {
        let table = XmlIngestor::new().ingest_strict(CATALOG_XML.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["sku", "brand", "price"]);
        assert_eq!(table.row_count(), 3);
        assert!(table.cell(0, "price").is_missing());
        assert!(table.cell(1, "brand").is_missing());
        // Present but empty element is missing too
        assert!(table.cell(2, "brand").is_missing());
        assert_eq!(table.cell(2, "price"), &Cell::from_raw("1.00"));
    }

    #[test]
    fn test_duplicate_child_last_wins() {
        let xml = b"<r><rec><v>1</v><v>2</v></rec><rec><v>3</v></rec></r>";
        let table = XmlIngestor::new().ingest_strict(xml).unwrap();

        assert_eq!(table.columns, vec!["v"]);
        assert_eq!(table.cell(0, "v"), &Cell::from_raw("2"));
    }

    #[test]
    fn test_grandchildren_and_attributes_ignored() {
        let xml = br#"<r><rec id="1"><a>x</a><nested><deep>y</deep></nested></rec><rec id="2"/></r>"#;
        let table = XmlIngestor::new().ingest_strict(xml).unwrap();

        assert_eq!(table.columns, vec!["a", "nested"]);
        assert!(table.cell(0, "nested").is_missing());
        assert!(table.cell(1, "a").is_missing());
    }

    #[test]
    fn test_no_repetition_is_warning_with_empty_table() {
        let outcome = XmlIngestor::new().ingest(b"<r><a><b>1</b></a><c/></r>");

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.warning, Some(AppError::NoRepeatingStructure));
    }

    #[test]
    fn test_malformed_is_warning_with_empty_table() {
        let outcome = XmlIngestor::new().ingest(b"<r><a></r>");

        assert!(outcome.table.is_empty());
        assert!(matches!(outcome.warning, Some(AppError::MalformedXml(_))));
    }

    #[test]
    fn test_very_deep_document_is_warning_with_empty_table() {
        let depth = 200_000;
        let mut xml = "<n>".repeat(depth);
        xml.push_str(&"</n>".repeat(depth));

        let outcome = XmlIngestor::new().ingest(xml.as_bytes());

        assert!(outcome.table.is_empty());
        assert!(matches!(outcome.warning, Some(AppError::MalformedXml(_))));
    }

    #[test]
    fn test_strict_reports_errors() {
        let err = XmlIngestor::new().ingest_strict(b"<r/>").unwrap_err();
        assert_eq!(err, AppError::NoRepeatingStructure);
    }
}
