pub mod table_parser;

pub use table_parser::{Parser, TableFormat, TableParser};
