//! In-memory gateway for tests.
//!
//! Not a SQL engine. It understands the statement shapes the repositories in
//! this workspace issue: a full-table read when no parameters are bound, and
//! an id-equality read when one is. Ids are assigned from a counter rendered
//! as text, matching how the Postgres schema assigns them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Predicate, Row, StorageGateway};
use crate::error::StorageError;

#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    next_id: AtomicU64,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Gateway whose first assigned id will be `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(first_id),
        }
    }

    /// Rows currently stored in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

/// The table name is the token after FROM.
fn table_of(statement: &str) -> Option<String> {
    let mut words = statement.split_whitespace();
    words
        .by_ref()
        .find(|w| w.eq_ignore_ascii_case("from"))
        .and_then(|_| words.next())
        .map(|t| t.trim_end_matches(';').to_string())
}

#[async_trait]
impl StorageGateway for MemoryGateway {
    async fn query(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, StorageError> {
        let table = table_of(statement).ok_or_else(|| {
            StorageError::Decode(format!("statement names no table: {statement}"))
        })?;
        let tables = self.tables.lock().unwrap();
        let rows = tables.get(&table).cloned().unwrap_or_default();

        match params.first() {
            None => Ok(rows),
            Some(id) => Ok(rows
                .into_iter()
                .filter(|row| row.get("id") == Some(id))
                .collect()),
        }
    }

    async fn insert(&self, table: &str, mut record: Row) -> Result<String, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        record.insert("id".to_string(), Value::from(id.clone()));
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record);
        Ok(id)
    }

    async fn delete(&self, table: &str, predicate: Predicate) -> Result<u64, StorageError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| row.get(&predicate.column) != Some(&predicate.value));
        Ok((before - rows.len()) as u64)
    }
}
