//! Pool trait for statement executors

use crate::error::Result;
use crate::value::Value;
use async_trait::async_trait;

/// Result of a statement execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Number of rows affected by the statement
    pub rows_affected: u64,
    /// Last insert ID (for INSERT statements)
    pub last_insert_id: Option<u64>,
}

/// Something that can execute parameterized SQL statements.
///
/// Implemented by connection pools and by transactions, so bulk statements
/// run unchanged against either.
#[async_trait]
pub trait Pool: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult>;

    /// The name of the SQL dialect spoken by this executor (e.g. `"mysql"`).
    ///
    /// Bulk statements use it to pick the bound-parameter budget.
    fn dialect(&self) -> &str;
}

#[async_trait]
impl<P: Pool + ?Sized> Pool for &P {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        (**self).execute(sql, params).await
    }

    fn dialect(&self) -> &str {
        (**self).dialect()
    }
}
