//! Default configuration values - single source of truth

/// Maximum number of bound parameters in one statement
pub const MAXIMUM_PLACEHOLDERS: usize = 65536;

/// Bound-parameter limit of SQLite (`SQLITE_MAX_VARIABLE_NUMBER`)
pub const SQLITE_PLACEHOLDERS: usize = 999;

/// Dialect name prefix that selects the SQLite limit
pub const LOW_LIMIT_DIALECT: &str = "sqlite";

/// Config file looked up by [`super::BulkConfig::load`] when no path is given
pub const CONFIG_FILE: &str = "sqlbulk";

/// Environment variable prefix (`SQLBULK_MAX_PLACEHOLDERS`, ...)
pub const ENV_PREFIX: &str = "SQLBULK";
