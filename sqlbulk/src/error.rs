//! Error types for sqlbulk

use thiserror::Error;

/// Result type alias for sqlbulk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or executing a bulk statement
#[derive(Error, Debug)]
pub enum Error {
    /// MySQL driver error
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// A type or field identifier could not be converted to a column name
    #[error("Invalid identifier `{identifier}`: {reason}")]
    InvalidIdentifier {
        identifier: String,
        reason: &'static str,
    },

    /// Every included field was zero in every record
    #[error("No column could be resolved for table `{0}`")]
    NoColumns(String),

    /// A unique key names a column that is not part of the statement
    #[error("Unknown column `{column}` for table `{table}`")]
    UnknownColumn { table: String, column: String },

    /// The unique keys leave nothing to update on conflict
    #[error("Invalid unique keys: {0}")]
    InvalidUniqueKeys(String),

    /// A single record needs more placeholders than the database allows
    #[error("A single record needs {needed} placeholders, limit is {limit}")]
    TooManyPlaceholders { needed: usize, limit: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
