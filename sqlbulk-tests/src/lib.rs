//! In-memory executor for exercising bulk statements without a database.
//!
//! `MemoryPool` records every transaction event and keeps the statements of
//! committed transactions. A failure can be injected on the n-th executed
//! statement to check rollback behavior.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sqlbulk::{
    Error, ExecuteResult, IsolationLevel, Pool, Result, Statement, Transaction, Transactional,
    Value,
};

/// Something that happened on a [`MemoryPool`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(IsolationLevel),
    Execute { sql: String, params: usize },
    Commit,
    Rollback,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    committed: Vec<Statement>,
    executed: usize,
    fail_on: Option<usize>,
    next_insert_id: u64,
}

impl State {
    fn run(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        self.executed += 1;
        self.events.push(Event::Execute {
            sql: sql.to_string(),
            params: params.len(),
        });

        if self.fail_on == Some(self.executed) {
            return Err(Error::Query(format!(
                "injected failure on statement {}",
                self.executed
            )));
        }

        // One `(?` per row placeholder group
        let rows = sql.matches("(?").count() as u64;
        let first_id = self.next_insert_id + 1;
        self.next_insert_id += rows;

        Ok(ExecuteResult {
            rows_affected: rows,
            last_insert_id: Some(first_id),
        })
    }
}

/// A recording executor that speaks a configurable dialect.
#[derive(Clone)]
pub struct MemoryPool {
    dialect: String,
    state: Arc<Mutex<State>>,
}

impl MemoryPool {
    pub fn new(dialect: &str) -> Self {
        Self {
            dialect: dialect.to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Fail the n-th executed statement (1-based, counted across transactions).
    pub fn fail_on(self, statement: usize) -> Self {
        self.lock().fail_on = Some(statement);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Statements of committed transactions, in execution order.
    pub fn committed(&self) -> Vec<Statement> {
        self.lock().committed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Pool for MemoryPool {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        let mut state = self.lock();
        let result = state.run(sql, &params)?;
        state.committed.push(Statement {
            sql: sql.to_string(),
            params,
        });
        Ok(result)
    }

    fn dialect(&self) -> &str {
        &self.dialect
    }
}

impl Transactional for MemoryPool {
    type Tx = MemoryTransaction;

    async fn begin_with(&self, level: IsolationLevel) -> Result<Self::Tx> {
        self.lock().events.push(Event::Begin(level));
        Ok(MemoryTransaction {
            pool: self.clone(),
            pending: Mutex::new(Some(Vec::new())),
        })
    }
}

/// A transaction on a [`MemoryPool`]; statements become visible on commit.
pub struct MemoryTransaction {
    pool: MemoryPool,
    pending: Mutex<Option<Vec<Statement>>>,
}

impl MemoryTransaction {
    fn take_pending(&self) -> Result<Vec<Statement>> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| Error::Query("Transaction already consumed".to_string()))
    }
}

#[async_trait]
impl Pool for MemoryTransaction {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let pending = pending
            .as_mut()
            .ok_or_else(|| Error::Query("Transaction already consumed".to_string()))?;

        let result = self.pool.lock().run(sql, &params)?;
        pending.push(Statement {
            sql: sql.to_string(),
            params,
        });
        Ok(result)
    }

    fn dialect(&self) -> &str {
        self.pool.dialect()
    }
}

impl Transaction for MemoryTransaction {
    async fn commit(&self) -> Result<()> {
        let statements = self.take_pending()?;
        let mut state = self.pool.lock();
        state.committed.extend(statements);
        state.events.push(Event::Commit);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.take_pending()?;
        self.pool.lock().events.push(Event::Rollback);
        Ok(())
    }
}
