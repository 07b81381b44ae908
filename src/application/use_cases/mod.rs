pub mod csv_ingestion;
pub mod source_resolver;
pub mod table_analysis;
pub mod table_filter;
pub mod xml_ingestion;
