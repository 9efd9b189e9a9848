//! Transaction traits for sqlbulk

use crate::error::Result;
use crate::traits::Pool;
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationLevel {
    /// Allows dirty reads, non-repeatable reads, and phantom reads.
    ReadUncommitted,

    /// Prevents dirty reads but allows non-repeatable reads and phantom reads.
    ReadCommitted,

    /// Prevents dirty reads and non-repeatable reads but allows phantom reads.
    /// This is the MySQL default and the default for bulk statements.
    #[default]
    RepeatableRead,

    /// Full isolation.
    Serializable,
}

/// A database transaction.
///
/// Transaction implements `Pool`, so bulk statements execute on it exactly
/// as they would on a pool.
pub trait Transaction: Pool {
    /// Commit the transaction, making all changes permanent.
    ///
    /// After calling commit, the transaction is consumed and can no longer be used.
    fn commit(&self) -> impl Future<Output = Result<()>> + Send;

    /// Rollback the transaction, discarding all changes.
    ///
    /// After calling rollback, the transaction is consumed and can no longer be used.
    fn rollback(&self) -> impl Future<Output = Result<()>> + Send;
}

/// A pool that can begin transactions.
///
/// # Example
///
/// ```ignore
/// let rows = pool.in_transaction(|tx| Box::pin(async move {
///     let result = tx.execute("INSERT INTO tb_user (name) VALUES (?)", vec!["sunary".into()]).await?;
///     Ok(result.rows_affected)
/// })).await?;
/// ```
pub trait Transactional: Pool {
    /// The transaction type for this pool.
    type Tx: Transaction + Send + Sync;

    /// Begin a new transaction with the default isolation level.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx>> + Send {
        self.begin_with(IsolationLevel::default())
    }

    /// Begin a new transaction with the specified isolation level.
    fn begin_with(&self, level: IsolationLevel) -> impl Future<Output = Result<Self::Tx>> + Send;

    /// Execute a closure within a transaction with the default isolation level.
    ///
    /// The transaction is committed if the closure returns `Ok`, and rolled
    /// back if it returns `Err`.
    fn in_transaction<R, F>(&self, f: F) -> impl Future<Output = Result<R>> + Send
    where
        R: Send,
        F: for<'a> FnOnce(&'a Self::Tx) -> Pin<Box<dyn Future<Output = Result<R>> + Send + 'a>>
            + Send,
    {
        self.in_transaction_with(IsolationLevel::default(), f)
    }

    /// Execute a closure within a transaction with the specified isolation level.
    fn in_transaction_with<R, F>(
        &self,
        level: IsolationLevel,
        f: F,
    ) -> impl Future<Output = Result<R>> + Send
    where
        R: Send,
        F: for<'a> FnOnce(&'a Self::Tx) -> Pin<Box<dyn Future<Output = Result<R>> + Send + 'a>>
            + Send,
    {
        async move {
            let tx = self.begin_with(level).await?;

            match f(&tx).await {
                Ok(result) => {
                    tx.commit().await?;
                    Ok(result)
                }
                Err(e) => {
                    // The original error wins over a failed rollback
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!("Rollback failed: {}", rollback_err);
                    }
                    Err(e)
                }
            }
        }
    }
}
