//! Bulk insert and upsert operations for sqlbulk

use tracing::{debug, info, trace, warn};

use crate::config::BulkConfig;
use crate::error::{Error, Result};
use crate::schema::{table_name, ColumnMapping};
use crate::traits::{ExecuteResult, IsolationLevel, Pool, Record, Transactional};
use crate::value::Value;

/// One parameterized statement of a bulk plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The statements a bulk call will run, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkPlan {
    /// Target table
    pub table: String,
    /// Resolved columns in statement order
    pub columns: Vec<String>,
    /// Columns updated on a duplicate key (empty for plain inserts)
    pub update_columns: Vec<String>,
    /// Records per batch, derived from the placeholder budget
    pub batch_size: usize,
    /// Number of record batches
    pub batches: usize,
    pub statements: Vec<Statement>,
}

/// A bulk insert builder.
///
/// Records are split into batches that stay under the database's bound
/// parameter limit. Plain inserts become one multi-row `INSERT` per batch.
/// With unique keys every record becomes its own
/// `INSERT ... ON DUPLICATE KEY UPDATE` statement. All statements of one
/// call run in a single transaction; the first failure rolls everything back.
///
/// # Example
///
/// ```ignore
/// use sqlbulk::BulkInsert;
///
/// let result = BulkInsert::new(&users)
///     .table("tb_user")
///     .unique_keys(["name"])
///     .execute(&pool)
///     .await?;
///
/// println!("Affected {} rows", result.rows_affected);
/// ```
pub struct BulkInsert<'a, T> {
    records: &'a [T],
    table: Option<String>,
    unique_keys: Vec<String>,
    config: BulkConfig,
    isolation: IsolationLevel,
}

impl<'a, T: Record> BulkInsert<'a, T> {
    /// Create a bulk insert for the given records.
    pub fn new(records: &'a [T]) -> Self {
        Self {
            records,
            table: None,
            unique_keys: Vec::new(),
            config: BulkConfig::default(),
            isolation: IsolationLevel::default(),
        }
    }

    /// Insert into this table instead of the one the record type names.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Upsert on these unique key columns.
    ///
    /// Every other resolved column is updated on a duplicate key. An empty
    /// list means a plain insert.
    pub fn unique_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_keys.clear();
        for key in keys {
            let key = key.into();
            if !self.unique_keys.contains(&key) {
                self.unique_keys.push(key);
            }
        }
        self
    }

    /// Use custom placeholder budgets.
    pub fn config(mut self, config: BulkConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the transaction at this isolation level.
    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation = level;
        self
    }

    /// Build every statement for the given dialect without touching the database.
    pub fn plan(&self, dialect: &str) -> Result<BulkPlan> {
        let table = match &self.table {
            Some(table) => table.clone(),
            None => table_name::<T>()?,
        };

        if self.records.is_empty() {
            return Ok(BulkPlan {
                table,
                columns: Vec::new(),
                update_columns: Vec::new(),
                batch_size: 0,
                batches: 0,
                statements: Vec::new(),
            });
        }

        let mapping = ColumnMapping::resolve(self.records)?;
        if mapping.is_empty() {
            return Err(Error::NoColumns(table));
        }

        let is_upsert = !self.unique_keys.is_empty();
        if is_upsert {
            validate_unique_keys(&table, &mapping, &self.unique_keys)?;
        }

        let per_record = if is_upsert {
            mapping.len() * 2 - self.unique_keys.len()
        } else {
            mapping.len()
        };
        let budget = self.config.placeholder_budget(dialect);
        if per_record > budget {
            return Err(Error::TooManyPlaceholders {
                needed: per_record,
                limit: budget,
            });
        }
        let batch_size = budget / per_record;

        let columns = mapping.columns().join(", ");
        let row_placeholder = format!("({})", vec!["?"; mapping.len()].join(", "));

        let mut statements = Vec::new();
        let mut update_columns = Vec::new();
        let mut batches = 0;

        for batch in self.records.chunks(batch_size) {
            batches += 1;
            let (values, update_tags) = slice_values(batch, &mapping, &self.unique_keys);

            if is_upsert {
                let assignments = update_tags
                    .iter()
                    .map(|c| format!("{} = ?", c))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES {} ON DUPLICATE KEY UPDATE {}",
                    table, columns, row_placeholder, assignments
                );

                let args_per_record = mapping.len() + update_tags.len();
                statements.extend(values.chunks(args_per_record).map(|params| Statement {
                    sql: sql.clone(),
                    params: params.to_vec(),
                }));
                update_columns = update_tags;
            } else {
                let placeholders = vec![row_placeholder.as_str(); batch.len()].join(",\n");
                statements.push(Statement {
                    sql: format!(
                        "INSERT INTO {} ({}) VALUES {}",
                        table, columns, placeholders
                    ),
                    params: values,
                });
            }
        }

        debug!(
            "Planned {} statements for `{}`: columns [{}], batch size {}, {} batches",
            statements.len(),
            table,
            columns,
            batch_size,
            batches
        );

        Ok(BulkPlan {
            table,
            columns: mapping.columns().to_vec(),
            update_columns,
            batch_size,
            batches,
            statements,
        })
    }

    /// Execute all statements inside one transaction.
    ///
    /// Returns the total number of affected rows and the last insert ID
    /// reported by the first statement.
    pub async fn execute<P: Transactional>(self, pool: &P) -> Result<ExecuteResult> {
        let BulkPlan {
            table, statements, ..
        } = self.plan(pool.dialect())?;

        if statements.is_empty() {
            return Ok(ExecuteResult::default());
        }

        let count = statements.len();
        let result = pool
            .in_transaction_with(self.isolation, move |tx| {
                Box::pin(async move {
                    let mut total = ExecuteResult::default();
                    for (i, statement) in statements.into_iter().enumerate() {
                        trace!(
                            "Executing statement {} with params [{}]: {}",
                            i + 1,
                            param_types(&statement.params),
                            statement.sql
                        );
                        let result = tx.execute(&statement.sql, statement.params).await?;
                        total.rows_affected += result.rows_affected;
                        if i == 0 {
                            total.last_insert_id = result.last_insert_id;
                        }
                    }
                    Ok(total)
                })
            })
            .await;

        match &result {
            Ok(total) => info!(
                "Committed {} statements into `{}` ({} rows affected)",
                count, table, total.rows_affected
            ),
            Err(e) => warn!("Rolled back bulk insert into `{}`: {}", table, e),
        }

        result
    }
}

/// Comma-separated parameter types, e.g. `string, i32, string, i32`.
fn param_types(params: &[Value]) -> String {
    params
        .iter()
        .map(Value::type_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_unique_keys(table: &str, mapping: &ColumnMapping, keys: &[String]) -> Result<()> {
    if let Some(key) = keys.iter().find(|k| !mapping.columns().contains(k)) {
        return Err(Error::UnknownColumn {
            table: table.to_string(),
            column: key.clone(),
        });
    }
    if keys.len() >= mapping.len() {
        return Err(Error::InvalidUniqueKeys(format!(
            "keys [{}] leave no column of `{}` to update",
            keys.join(", "),
            table
        )));
    }
    Ok(())
}

/// Collect the statement arguments for a batch of records.
///
/// Without unique keys the result is every resolved column value, record
/// after record. With unique keys each record's values are followed by its
/// non-key values again, for the `ON DUPLICATE KEY UPDATE` clause; the second
/// return value lists those update columns.
pub fn slice_values<T: Record>(
    records: &[T],
    mapping: &ColumnMapping,
    unique_keys: &[String],
) -> (Vec<Value>, Vec<String>) {
    let is_upsert = !unique_keys.is_empty();

    // (field index, is update column) in column order
    let slots: Vec<(usize, bool)> = mapping
        .field_indexes()
        .zip(mapping.columns())
        .map(|(index, column)| (index, is_upsert && !unique_keys.contains(column)))
        .collect();

    let update_tags: Vec<String> = mapping
        .columns()
        .iter()
        .zip(&slots)
        .filter(|(_, (_, update))| *update)
        .map(|(column, _)| column.clone())
        .collect();

    let mut values = Vec::with_capacity(records.len() * (slots.len() + update_tags.len()));
    for record in records {
        let row_start = values.len();
        values.extend(slots.iter().map(|(index, _)| record.value_at(*index)));

        if is_upsert {
            for (offset, (_, update)) in slots.iter().enumerate() {
                if *update {
                    let value = values[row_start + offset].clone();
                    values.push(value);
                }
            }
        }
    }

    (values, update_tags)
}

/// Insert records into the table their type names.
pub async fn bulk_insert<P, T>(pool: &P, records: &[T]) -> Result<ExecuteResult>
where
    P: Transactional,
    T: Record,
{
    BulkInsert::new(records).execute(pool).await
}

/// Insert records into an explicit table.
pub async fn bulk_insert_with_table_name<P, T>(
    pool: &P,
    table: &str,
    records: &[T],
) -> Result<ExecuteResult>
where
    P: Transactional,
    T: Record,
{
    BulkInsert::new(records).table(table).execute(pool).await
}

/// Upsert records into the table their type names, keyed on `unique_keys`.
pub async fn bulk_upsert<P, T>(pool: &P, records: &[T], unique_keys: &[&str]) -> Result<ExecuteResult>
where
    P: Transactional,
    T: Record,
{
    BulkInsert::new(records)
        .unique_keys(unique_keys.iter().copied())
        .execute(pool)
        .await
}

/// Upsert records into an explicit table, keyed on `unique_keys`.
pub async fn bulk_upsert_with_table_name<P, T>(
    pool: &P,
    table: &str,
    records: &[T],
    unique_keys: &[&str],
) -> Result<ExecuteResult>
where
    P: Transactional,
    T: Record,
{
    BulkInsert::new(records)
        .table(table)
        .unique_keys(unique_keys.iter().copied())
        .execute(pool)
        .await
}
