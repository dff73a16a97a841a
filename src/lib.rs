pub mod args;
pub mod config;
pub mod dataset;
pub mod db;
pub mod etl;

pub use args::{Cli, Commands};
pub use config::{AppConfig, DbConfig};
pub use dataset::{Dataset, Value};
pub use db::Connection;
pub use etl::{LoadReport, Loader};

#[derive(Debug, Clone, PartialEq)]
pub enum DbError {
    Connection(String),
    Write(String),
    Query(String),
    Csv(String),
    Config(String),
    InvalidOperation(String),
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::Connection(msg) => write!(f, "Connection error: {}", msg),
            DbError::Write(msg) => write!(f, "Write error: {}", msg),
            DbError::Query(msg) => write!(f, "Query error: {}", msg),
            DbError::Csv(msg) => write!(f, "CSV error: {}", msg),
            DbError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DbError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for DbError {}

// Result type for db operations
pub type DbResult<T> = Result<T, DbError>;
