use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// Bytes are not valid under the detected or requested encoding.
    Decode(String),
    /// No candidate delimiter occurs in the sniffed sample.
    UnparsableDelimiter,
    /// Delimited text could not be parsed (bad quoting, unreadable header).
    ParseError(String),
    MalformedXml(String),
    NoRepeatingStructure,
    InvalidSheetUrl(String),
    Network(String),
    /// Every applicable ingestion strategy failed, or the kind is not accepted.
    UnsupportedFormat(String),
    ValidationError(String),
    NotFound(String),
    IoError(String),
    Internal(String),
}

impl AppError {
    /// Structural XML problems yield an empty table plus a warning instead of
    /// aborting the ingestion.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::MalformedXml(_) | AppError::NoRepeatingStructure)
    }

    /// Stable machine-readable name, used in API payloads and notices.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Decode(_) => "decode",
            AppError::UnparsableDelimiter => "unparsable_delimiter",
            AppError::ParseError(_) => "parse",
            AppError::MalformedXml(_) => "malformed_xml",
            AppError::NoRepeatingStructure => "no_repeating_structure",
            AppError::InvalidSheetUrl(_) => "invalid_sheet_url",
            AppError::Network(_) => "network",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::ValidationError(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::IoError(_) => "io",
            AppError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Decode(msg) => write!(f, "Decode error: {}", msg),
            AppError::UnparsableDelimiter => {
                write!(f, "No delimiter could be detected in the first lines")
            }
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::MalformedXml(msg) => write!(f, "XML syntax error: {}", msg),
            AppError::NoRepeatingStructure => {
                write!(f, "No repeating element was detected in the XML document")
            }
            AppError::InvalidSheetUrl(url) => write!(
                f,
                "Invalid Google Sheets URL (no document id found): {}",
                url
            ),
            AppError::Network(msg) => write!(f, "Download failed: {}", msg),
            AppError::UnsupportedFormat(msg) => write!(f, "Unsupported file format: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
