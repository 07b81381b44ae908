// ============================================================
// SOURCE RESOLVER USE CASE
// ============================================================
// Decide the file kind of an upload or URL and run the ingestors

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::use_cases::csv_ingestion::CsvIngestor;
use crate::application::use_cases::xml_ingestion::XmlIngestor;
use crate::domain::error::{AppError, Result};
use crate::domain::source::{
    ExtensionMatch, FileKind, IngestReport, IngestionConfig, RawInput, StrategyFailure,
};
use crate::infrastructure::http::{sheets, ResourceFetcher};

/// Strategies tried, in order, when nothing identifies the kind
pub const FALLBACK_STRATEGIES: [FileKind; 2] = [FileKind::Csv, FileKind::Xml];

/// How an input will be ingested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionPlan {
    /// Kind known from the extension or content type
    Direct(FileKind),
    /// Kind unknown: try each strategy until one succeeds
    Fallback(Vec<FileKind>),
}

pub struct SourceResolver {
    config: IngestionConfig,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl SourceResolver {
    pub fn new(config: IngestionConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Ingest an uploaded file
    pub fn resolve_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<IngestReport> {
        info!(file_name, bytes = bytes.len(), "ingesting upload");
        self.ingest(RawInput::upload(file_name, bytes))
    }

    /// Download and ingest a URL. Google Sheets links are fetched through
    /// their CSV export endpoint.
    pub fn resolve_url(&self, url: &str) -> Result<IngestReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::ValidationError("URL must not be empty".to_string()));
        }

        if sheets::is_google_sheets_url(url) {
            let export_url = sheets::export_url(url)?;
            info!(url, export_url = %export_url, "rewrote Google Sheets link");
            let resource = self.fetcher.fetch(&export_url)?;
            return self.run_strategy(FileKind::Csv, &resource.bytes, false);
        }

        let resource = self.fetcher.fetch(url)?;
        self.ingest(RawInput::download(url, resource.content_type, resource.bytes))
    }

    /// Resolution order: extension, then content type, then the ordered
    /// fallback strategies. Uploads with an unknown extension are refused.
    pub fn plan(&self, input: &RawInput) -> Result<IngestionPlan> {
        let extension = input.extension();
        match FileKind::from_extension(extension.as_deref()) {
            ExtensionMatch::Kind(kind) => return Ok(IngestionPlan::Direct(kind)),
            ExtensionMatch::Unsupported if input.is_upload() => {
                return Err(AppError::UnsupportedFormat(format!(
                    "extension .{} is not one of csv, xml, txt",
                    extension.unwrap_or_default()
                )));
            }
            _ => {}
        }

        if let Some(kind) = input.content_type().and_then(FileKind::from_content_type) {
            return Ok(IngestionPlan::Direct(kind));
        }

        Ok(IngestionPlan::Fallback(FALLBACK_STRATEGIES.to_vec()))
    }

    pub fn ingest(&self, input: RawInput) -> Result<IngestReport> {
        match self.plan(&input)? {
            IngestionPlan::Direct(kind) => self.run_strategy(kind, &input.bytes, false),
            IngestionPlan::Fallback(strategies) => self.run_fallback(&strategies, &input.bytes),
        }
    }

    /// Try each strategy in order. Inside the chain XML is strict, so an
    /// unparseable document counts as a failed attempt.
    fn run_fallback(&self, strategies: &[FileKind], bytes: &[u8]) -> Result<IngestReport> {
        let mut failures: Vec<StrategyFailure> = Vec::new();

        for &strategy in strategies {
            match self.run_strategy(strategy, bytes, true) {
                Ok(mut report) => {
                    info!(strategy = %strategy, failed = failures.len(), "fallback strategy succeeded");
                    report.failed_attempts = failures;
                    return Ok(report);
                }
                Err(error) => {
                    warn!(strategy = %strategy, error = %error, "fallback strategy failed");
                    failures.push(StrategyFailure { strategy, error });
                }
            }
        }

        let attempts = failures
            .iter()
            .map(|f| format!("{}: {}", f.strategy, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        Err(AppError::UnsupportedFormat(format!(
            "content is neither CSV nor XML ({})",
            attempts
        )))
    }

    fn run_strategy(&self, kind: FileKind, bytes: &[u8], strict: bool) -> Result<IngestReport> {
        match kind {
            FileKind::Csv => {
                let ingestion = CsvIngestor::new(self.config.clone()).ingest_detailed(bytes)?;
                let mut report = IngestReport::new(ingestion.table, FileKind::Csv);
                report.encoding = Some(ingestion.encoding);
                report.delimiter = Some(ingestion.delimiter);
                Ok(report)
            }
            FileKind::Xml if strict => {
                let table = XmlIngestor::new().ingest_strict(bytes)?;
                Ok(IngestReport::new(table, FileKind::Xml))
            }
            FileKind::Xml => {
                let ingestion = XmlIngestor::new().ingest(bytes);
                let mut report = IngestReport::new(ingestion.table, FileKind::Xml);
                report.warning = ingestion.warning;
                Ok(report)
            }
        }
    }
}
