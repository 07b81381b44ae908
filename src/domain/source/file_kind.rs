use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of tabular source an input resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Xml,
}

/// Outcome of looking at a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionMatch {
    Kind(FileKind),
    /// Accepted extension that says nothing about the content (`.txt`)
    Ambiguous,
    /// No extension at all
    Absent,
    Unsupported,
}

impl FileKind {
    pub fn from_extension(extension: Option<&str>) -> ExtensionMatch {
        let Some(extension) = extension else {
            return ExtensionMatch::Absent;
        };
        match extension.to_lowercase().as_str() {
            "csv" => ExtensionMatch::Kind(FileKind::Csv),
            "xml" => ExtensionMatch::Kind(FileKind::Xml),
            "txt" => ExtensionMatch::Ambiguous,
            _ => ExtensionMatch::Unsupported,
        }
    }

    /// Substring match on an HTTP `Content-Type`, csv checked first
    pub fn from_content_type(content_type: &str) -> Option<FileKind> {
        let lower = content_type.to_lowercase();
        if lower.contains("csv") {
            Some(FileKind::Csv)
        } else if lower.contains("xml") {
            Some(FileKind::Xml)
        } else {
            None
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Csv => write!(f, "csv"),
            FileKind::Xml => write!(f, "xml"),
        }
    }
}
