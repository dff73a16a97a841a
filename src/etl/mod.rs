pub mod csv_parser;
pub mod loader;

pub use csv_parser::CsvParser;
pub use loader::{LoadReport, Loader};
