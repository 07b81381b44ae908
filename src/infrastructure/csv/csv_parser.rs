// ============================================================
// CSV PARSER
// ============================================================
// Parse decoded delimited text into a string-typed table

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, Table};

/// Delimited text parser; the first record is the header row
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values (default: false)
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse CSV content from string.
    ///
    /// Short rows are padded with missing cells; a row wider than the
    /// header is rejected. Empty fields become missing.
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        self.check_quotes(content)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Table::with_columns(headers.clone());

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                let line = record.position().map_or(index as u64 + 2, |p| p.line());
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            table.push_record(
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| (name.clone(), Cell::from_raw(record.get(idx).unwrap_or("")))),
            );
        }

        Ok(table)
    }

    /// The csv reader accepts a quote left open at end of input and folds
    /// the remainder of the text into one field; refuse that instead.
    /// Mirrors the reader's field states: a quote opens a quoted field only
    /// at field start, and `""` inside quotes is an escaped quote.
    fn check_quotes(&self, content: &str) -> Result<()> {
        let mut state = QuoteState::FieldStart;
        let mut line = 1usize;
        let mut opened_at = 1usize;

        for byte in content.bytes() {
            let boundary = byte == self.delimiter || byte == b'\n' || byte == b'\r';
            state = match (state, byte) {
                (QuoteState::FieldStart, b'"') => {
                    opened_at = line;
                    QuoteState::Quoted
                }
                (QuoteState::FieldStart, _) | (QuoteState::Unquoted, _) if boundary => {
                    QuoteState::FieldStart
                }
                (QuoteState::FieldStart, _) | (QuoteState::Unquoted, _) => QuoteState::Unquoted,
                (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
                (QuoteState::Quoted, _) => QuoteState::Quoted,
                (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
                (QuoteState::QuoteInQuoted, _) if boundary => QuoteState::FieldStart,
                (QuoteState::QuoteInQuoted, _) => QuoteState::Unquoted,
            };
            if byte == b'\n' {
                line += 1;
            }
        }

        if state == QuoteState::Quoted {
            return Err(AppError::ParseError(format!(
                "Unterminated quoted field starting on line {}",
                opened_at
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}
