pub mod error;
pub mod session;
pub mod source;
pub mod table;
