// ============================================================
// XML INFRASTRUCTURE LAYER
// ============================================================
// Tree parsing and repeating-structure detection

mod structure_locator;
mod tree_parser;

pub use structure_locator::locate_record_group;
pub use tree_parser::XmlTreeParser;
