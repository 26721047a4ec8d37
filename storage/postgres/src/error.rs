//! Error types for the Postgres execution boundary.

use polyglot_query::CompileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
}
