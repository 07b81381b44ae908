use serde::{Deserialize, Serialize};

use super::{Delimiter, DetectedEncoding, FileKind};
use crate::domain::error::AppError;
use crate::domain::table::Table;

/// One failed attempt in the ordered fallback chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: FileKind,
    pub error: AppError,
}

/// Everything an ingestion produced, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub table: Table,
    pub kind: FileKind,
    pub encoding: Option<DetectedEncoding>,
    pub delimiter: Option<Delimiter>,
    /// Recoverable problem that left the table empty (XML only)
    pub warning: Option<AppError>,
    /// Strategies that failed before `kind` succeeded
    pub failed_attempts: Vec<StrategyFailure>,
}

impl IngestReport {
    pub fn new(table: Table, kind: FileKind) -> Self {
        Self {
            table,
            kind,
            encoding: None,
            delimiter: None,
            warning: None,
            failed_attempts: Vec::new(),
        }
    }
}
