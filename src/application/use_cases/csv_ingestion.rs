// ============================================================
// CSV INGESTION USE CASE
// ============================================================
// Orchestrate encoding detection, delimiter sniffing and parsing

use std::time::Instant;

use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::source::{Delimiter, DetectedEncoding, IngestionConfig};
use crate::domain::table::Table;
use crate::infrastructure::csv::{
    decode_strict, resolve_encoding, CsvParser, DelimiterSniffer, EncodingDetector,
};

/// Table plus what was detected on the way
#[derive(Debug, Clone, PartialEq)]
pub struct CsvIngestion {
    pub table: Table,
    pub encoding: DetectedEncoding,
    pub delimiter: Delimiter,
}

/// CSV ingestion use case
pub struct CsvIngestor {
    config: IngestionConfig,
}

impl CsvIngestor {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    pub fn ingest(&self, bytes: &[u8]) -> Result<Table> {
        self.ingest_detailed(bytes).map(|ingestion| ingestion.table)
    }

    /// Detect the encoding, sniff the delimiter, decode strictly and parse.
    ///
    /// Decoding errors are not recovered: bytes that are invalid under the
    /// detected encoding fail the whole ingestion.
    pub fn ingest_detailed(&self, bytes: &[u8]) -> Result<CsvIngestion> {
        let start = Instant::now();

        let encoding = EncodingDetector::detect(bytes);
        info!(
            encoding = %encoding.name,
            confidence = encoding.confidence,
            "detected CSV encoding"
        );

        if let Some(threshold) = self.config.min_encoding_confidence {
            if encoding.confidence < threshold {
                warn!(
                    confidence = encoding.confidence,
                    threshold, "encoding confidence below configured minimum"
                );
                return Err(AppError::Decode(format!(
                    "Encoding guess {} has confidence {:.2}, below the required {:.2}",
                    encoding.name, encoding.confidence, threshold
                )));
            }
        }

        let delimiter = DelimiterSniffer::new(self.config.sniff_lines)
            .sniff(bytes, &encoding.name)?
            .ok_or(AppError::UnparsableDelimiter)?;
        info!(delimiter = %delimiter, "sniffed CSV delimiter");

        let content = decode_strict(bytes, resolve_encoding(&encoding.name)?)?;
        let table = CsvParser::new()
            .with_delimiter(delimiter.as_byte())
            .parse_content(&content)?;

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "CSV ingestion complete"
        );

        Ok(CsvIngestion {
            table,
            encoding,
            delimiter,
        })
    }
}

impl Default for CsvIngestor {
    fn default() -> Self {
        Self::new(IngestionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;
    use crate::infrastructure::csv::CsvWriter;

    const SEMICOLON_CSV: &str = "\
marque;produit;prix
Acme;Gomme;1,20
Globex;;3,50
;Crayon;0,80";

    #[test]
    fn test_blank_cells_become_missing() {
        let ingestion = CsvIngestor::default()
            .ingest_detailed(b"a,b\n1,\n,2\n")
            .unwrap();

        assert_eq!(ingestion.delimiter, Delimiter::Comma);
        assert_eq!(ingestion.encoding.name, "UTF-8");
        let table = ingestion.table;
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.cell(0, "a"), &Cell::from_raw("1"));
        assert!(table.cell(0, "b").is_missing());
        assert!(table.cell(1, "a").is_missing());
        assert_eq!(table.cell(1, "b"), &Cell::from_raw("2"));
    }

    #[test]
    fn test_semicolon_file() {
        let table = CsvIngestor::default().ingest(SEMICOLON_CSV.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["marque", "produit", "prix"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, "prix"), &Cell::from_raw("1,20"));
        assert!(table.cell(1, "produit").is_missing());
        assert!(table.cell(2, "marque").is_missing());
    }

    #[test]
    fn test_windows_1252_file() {
        let bytes = b"nom;ville\nRen\xe9;S\xe8te\nZo\xe9;N\xeemes\nAnn\xe9e;Br\xe9st\n";
        let ingestion = CsvIngestor::default().ingest_detailed(bytes).unwrap();

        assert_ne!(ingestion.encoding.name, "UTF-8");
        assert_eq!(ingestion.delimiter, Delimiter::Semicolon);
        assert_eq!(ingestion.table.row_count(), 3);
    }

    #[test]
    fn test_no_delimiter_fails() {
        let err = CsvIngestor::default()
            .ingest(b"just a sentence\nand another\n")
            .unwrap_err();
        assert_eq!(err, AppError::UnparsableDelimiter);
    }

    #[test]
    fn test_unterminated_quote_fails() {
        let err = CsvIngestor::default()
            .ingest(b"a,b\n1,\"unterminated\n2,3\n")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)), "{:?}", err);
    }

    #[test]
    fn test_row_wider_than_header_fails() {
        let err = CsvIngestor::default()
            .ingest(b"a;b\n1;2\n3;4;5\n")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)), "{:?}", err);
    }

    #[test]
    fn test_confidence_gate() {
        let config = IngestionConfig {
            min_encoding_confidence: Some(0.9),
            ..Default::default()
        };
        let bytes = b"nom;ville\nRen\xe9;S\xe8te\n";
        let err = CsvIngestor::new(config).ingest(bytes).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));

        // Plain ASCII passes the same gate
        let config = IngestionConfig {
            min_encoding_confidence: Some(0.9),
            ..Default::default()
        };
        assert!(CsvIngestor::new(config).ingest(b"a,b\n1,2\n").is_ok());
    }

    #[test]
    fn test_round_trip_through_writer() {
        let original = "name,city,note\n\"Doe, Jane\",Paris,\nBob,,\"say \"\"hi\"\"\"\n";
        let ingestor = CsvIngestor::default();
        let first = ingestor.ingest(original.as_bytes()).unwrap();

        let written = CsvWriter::new().write_table(&first).unwrap();
        let second = ingestor.ingest(&written).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_with_tab_delimiter() {
        let original = "a\tb\n1\t\n\t2\n";
        let ingestor = CsvIngestor::default();
        let first = ingestor.ingest(original.as_bytes()).unwrap();

        let written = CsvWriter::new()
            .with_delimiter(Delimiter::Tab.as_byte())
            .write_table(&first)
            .unwrap();
        assert_eq!(ingestor.ingest(&written).unwrap(), first);
    }
}
