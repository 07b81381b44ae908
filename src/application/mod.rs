pub mod use_cases;

pub use use_cases::csv_ingestion::CsvIngestor;
pub use use_cases::source_resolver::SourceResolver;
pub use use_cases::table_analysis::TableAnalyzer;
pub use use_cases::table_filter::TableFilter;
pub use use_cases::xml_ingestion::XmlIngestor;
