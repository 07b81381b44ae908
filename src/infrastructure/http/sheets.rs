// Google Sheets share links are rewritten to their CSV export endpoint.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::{AppError, Result};

static QUERY_STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?.*$").unwrap());
static DOCUMENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").unwrap());

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// True for `docs.google.com/spreadsheets/...` links
pub fn is_google_sheets_url(url: &str) -> bool {
    match url::Url::parse(url.trim()) {
        Ok(parsed) => {
            parsed.host_str() == Some("docs.google.com")
                && parsed.path().starts_with("/spreadsheets/")
        }
        Err(_) => false,
    }
}

/// CSV export URL for a sheet link: `.../d/<id>/export?format=csv`.
pub fn export_url(url: &str) -> Result<String> {
    let without_query = QUERY_STRING.replace(url.trim(), "");
    let id = DOCUMENT_ID
        .captures(&without_query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AppError::InvalidSheetUrl(url.to_string()))?;

    Ok(format!("{}/{}/export?format=csv", EXPORT_BASE, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_link_rewrites_to_export() {
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/ABC123/edit#gid=0").unwrap(),
            "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv"
        );
    }

    #[test]
    fn test_query_string_is_stripped() {
        assert_eq!(
            export_url("https://docs.google.com/spreadsheets/d/a-B_9/edit?usp=sharing").unwrap(),
            "https://docs.google.com/spreadsheets/d/a-B_9/export?format=csv"
        );
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let err = export_url("https://docs.google.com/spreadsheets/u/0/").unwrap_err();
        assert!(matches!(err, AppError::InvalidSheetUrl(_)));
    }

    #[test]
    fn test_sheet_detection() {
        assert!(is_google_sheets_url(
            "https://docs.google.com/spreadsheets/d/ABC123/edit"
        ));
        assert!(!is_google_sheets_url("https://docs.google.com/document/d/ABC/edit"));
        assert!(!is_google_sheets_url("https://example.com/spreadsheets/d/x"));
        assert!(!is_google_sheets_url("data.csv"));
    }
}
