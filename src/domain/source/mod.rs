// ============================================================
// SOURCE DOMAIN LAYER
// ============================================================
// Raw inputs, detection results and ingestion reports

mod delimiter;
mod encoding;
mod file_kind;
mod ingestion_config;
mod raw_input;
mod report;
mod xml_node;

pub use delimiter::Delimiter;
pub use encoding::DetectedEncoding;
pub use file_kind::{ExtensionMatch, FileKind};
pub use ingestion_config::IngestionConfig;
pub use raw_input::{RawInput, SourceHint};
pub use report::{IngestReport, StrategyFailure};
pub use xml_node::XmlNode;
