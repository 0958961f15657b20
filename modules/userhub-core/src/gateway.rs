//! Storage gateway boundary.
//!
//! Resolvers never talk to a driver directly; they issue logical operations
//! through [`StorageGateway`] and get typed results back. The production
//! implementation is [`pg::PgGateway`]; tests use [`memory::MemoryGateway`].

pub mod pg;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

/// A row as returned by the gateway: column name to loosely-typed value.
pub type Row = serde_json::Map<String, Value>;

/// Single-column equality predicate for deletes.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// One logical storage operation per call, awaited to completion.
///
/// Table and column identifiers are supplied by trusted repository code,
/// never by clients; only values travel as bound parameters.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Run a parameterized read and return its rows.
    async fn query(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, StorageError>;

    /// Insert a record and return the store-assigned id.
    async fn insert(&self, table: &str, record: Row) -> Result<String, StorageError>;

    /// Delete rows matching the predicate and return the affected-row count.
    async fn delete(&self, table: &str, predicate: Predicate) -> Result<u64, StorageError>;
}
