mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{CsvIngestor, SourceResolver, TableAnalyzer, TableFilter, XmlIngestor};
pub use domain::error::{AppError, Result};
pub use domain::session::SessionContext;
pub use domain::source::{FileKind, IngestReport, IngestionConfig, RawInput};
pub use domain::table::{Cell, Table};
