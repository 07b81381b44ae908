// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core types for ingested tables, their profiles and filters
// No I/O, no async

mod cell;
mod filter;
mod profile;
mod table;

pub use cell::{Cell, MISSING_LABEL};
pub use filter::{FilterValue, ValueFilter};
pub use profile::{ColumnExploration, ColumnProfile, TableSummary, ValueCount, STRING_DTYPE};
pub use table::{Row, Table};
