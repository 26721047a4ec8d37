//! Postgres execution boundary for compiled polyglot statements.
//!
//! The compiler (`polyglot-query`) produces `(sql, values)` pairs; this crate
//! hands them to a pooled `tokio-postgres` connection. Errors surface
//! verbatim to the caller — the only local recovery is rolling back an open
//! transaction on a failure path. No retries happen here; retry policy
//! belongs to the caller.

pub mod error;
pub mod value;

use bb8_postgres::{tokio_postgres::NoTls, PostgresConnectionManager};
use polyglot_query::Value;
use tokio_postgres::types::ToSql;
use tracing::{debug, error};

pub use error::StoreError;
use value::params;

pub struct Store {
    pool: bb8::Pool<PostgresConnectionManager<NoTls>>,
}

impl Store {
    pub fn new(pool: bb8::Pool<PostgresConnectionManager<NoTls>>) -> Self { Self { pool } }

    /// Build a pooled store from a `tokio-postgres` config string.
    pub async fn connect(config: &str) -> Result<Self, StoreError> {
        let manager = PostgresConnectionManager::new_from_stringlike(config, NoTls)?;
        let pool = bb8::Pool::builder().build(manager).await?;
        Ok(Self { pool })
    }

    /// Execute a compiled statement, returning the affected row count.
    pub async fn execute(&self, sql: &str, values: &[Value]) -> Result<u64, StoreError> {
        let client = self.pool.get().await.map_err(|err| StoreError::Pool(err.to_string()))?;

        debug!("execute: {} [{} params]", sql, values.len());
        let params = params(values);
        let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|param| param as &(dyn ToSql + Sync)).collect();
        Ok(client.execute(sql, &refs).await?)
    }

    /// Run a compiled query, returning the matched rows.
    pub async fn query(&self, sql: &str, values: &[Value]) -> Result<Vec<tokio_postgres::Row>, StoreError> {
        let client = self.pool.get().await.map_err(|err| StoreError::Pool(err.to_string()))?;

        debug!("query: {} [{} params]", sql, values.len());
        let params = params(values);
        let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|param| param as &(dyn ToSql + Sync)).collect();
        Ok(client.query(sql, &refs).await?)
    }

    /// Execute a batch of compiled statements inside one transaction.
    ///
    /// Commits when every statement succeeds and returns the total affected
    /// row count. On the first failure the transaction is rolled back and
    /// the statement's own error is surfaced; a rollback failure is logged
    /// rather than masking it.
    pub async fn execute_in_transaction(&self, statements: &[(String, Vec<Value>)]) -> Result<u64, StoreError> {
        let mut client = self.pool.get().await.map_err(|err| StoreError::Pool(err.to_string()))?;
        let trx = client.transaction().await?;

        let mut affected = 0;
        for (sql, values) in statements {
            debug!("execute (trx): {} [{} params]", sql, values.len());
            let params = params(values);
            let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|param| param as &(dyn ToSql + Sync)).collect();
            match trx.execute(sql.as_str(), &refs).await {
                Ok(count) => affected += count,
                Err(err) => {
                    if let Err(rollback_err) = trx.rollback().await {
                        error!("rollback failed: {}", rollback_err);
                    }
                    return Err(err.into());
                }
            }
        }

        trx.commit().await?;
        Ok(affected)
    }
}
