//! MySQL transaction implementation

use crate::error::{Error, Result};
use crate::traits::{ExecuteResult, IsolationLevel, Pool, Transaction};
use crate::value::Value;
use async_trait::async_trait;
use mysql_async::prelude::*;
use tokio::sync::Mutex;

use super::types::to_mysql_params;
use super::DIALECT;

/// A MySQL transaction.
///
/// This wraps `mysql_async::Transaction` and implements both the `Pool` trait
/// (for statement execution) and the `Transaction` trait (for commit/rollback).
pub struct MySqlTransaction {
    // mysql_async::Transaction needs &mut self while Pool takes &self. A bulk
    // call drives the transaction from a single task, so the lock is uncontended.
    inner: Mutex<Option<mysql_async::Transaction<'static>>>,
}

impl MySqlTransaction {
    pub(crate) fn new(tx: mysql_async::Transaction<'static>) -> Self {
        Self {
            inner: Mutex::new(Some(tx)),
        }
    }

    /// Take the inner transaction, leaving None in its place.
    async fn take_inner(&self) -> Result<mysql_async::Transaction<'static>> {
        self.inner
            .lock()
            .await
            .take()
            .ok_or_else(|| Error::Query("Transaction already consumed".to_string()))
    }
}

#[async_trait]
impl Pool for MySqlTransaction {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        let mut guard = self.inner.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| Error::Query("Transaction already consumed".to_string()))?;

        tx.exec_drop(sql, to_mysql_params(&params)).await?;

        Ok(ExecuteResult {
            rows_affected: tx.affected_rows(),
            last_insert_id: tx.last_insert_id(),
        })
    }

    fn dialect(&self) -> &str {
        DIALECT
    }
}

impl Transaction for MySqlTransaction {
    async fn commit(&self) -> Result<()> {
        let tx = self.take_inner().await?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let tx = self.take_inner().await?;
        tx.rollback().await?;
        Ok(())
    }
}

pub(crate) fn to_mysql_isolation(level: IsolationLevel) -> mysql_async::IsolationLevel {
    match level {
        IsolationLevel::ReadUncommitted => mysql_async::IsolationLevel::ReadUncommitted,
        IsolationLevel::ReadCommitted => mysql_async::IsolationLevel::ReadCommitted,
        IsolationLevel::RepeatableRead => mysql_async::IsolationLevel::RepeatableRead,
        IsolationLevel::Serializable => mysql_async::IsolationLevel::Serializable,
    }
}
