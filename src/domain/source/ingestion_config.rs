// ============================================================
// INGESTION CONFIGURATION
// ============================================================
// Tunables for detection, fetching and presentation limits

use serde::{Deserialize, Serialize};

/// Configuration for source ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Number of leading lines sampled by the delimiter sniffer (default: 5)
    pub sniff_lines: usize,

    /// Timeout for URL downloads, in seconds (default: 30)
    pub fetch_timeout_secs: u64,

    /// User agent sent with URL downloads
    pub user_agent: String,

    /// Reject CSV input whose detected encoding scores below this value.
    /// `None` keeps the confidence advisory only (default).
    pub min_encoding_confidence: Option<f32>,

    /// Number of user-visible notices kept per session (default: 100)
    pub max_notices: usize,

    /// Rows included in a table summary preview (default: 5)
    pub preview_rows: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            sniff_lines: 5,
            fetch_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; TableScout/0.1)".to_string(),
            min_encoding_confidence: None,
            max_notices: 100,
            preview_rows: 5,
        }
    }
}

impl IngestionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.sniff_lines == 0 {
            return Err("sniff_lines must be > 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be > 0".to_string());
        }
        if let Some(threshold) = self.min_encoding_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err("min_encoding_confidence must be between 0.0 and 1.0".to_string());
            }
        }
        if self.max_notices == 0 {
            return Err("max_notices must be > 0".to_string());
        }
        Ok(())
    }
}
