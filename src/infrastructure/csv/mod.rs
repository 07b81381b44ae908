// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection, delimiter sniffing, parsing and export

mod csv_parser;
mod csv_writer;
mod delimiter_sniffer;
mod encoding_detector;

pub use csv_parser::CsvParser;
pub use csv_writer::CsvWriter;
pub use delimiter_sniffer::DelimiterSniffer;
pub use encoding_detector::{decode_strict, resolve_encoding, EncodingDetector};
