//! Postgres gateway backed by a sqlx pool.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row as _, TypeInfo};

use super::{Predicate, Row, StorageGateway};
use crate::error::StorageError;

/// Bind one JSON value as a query parameter, mapping to the closest
/// Postgres type. Objects and arrays go over as JSONB.
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            Value::Null => $query.bind(None::<String>),
            Value::Bool(b) => $query.bind(*b),
            Value::Number(n) if n.is_i64() => $query.bind(n.as_i64()),
            Value::Number(n) => $query.bind(n.as_f64()),
            Value::String(s) => $query.bind(s.clone()),
            other => $query.bind(other.clone()),
        }
    };
}

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StorageGateway for PgGateway {
    async fn query(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, StorageError> {
        let mut query = sqlx::query(statement);
        for param in params {
            query = bind_value!(query, param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn insert(&self, table: &str, record: Row) -> Result<String, StorageError> {
        let mut columns = Vec::with_capacity(record.len());
        let mut values = Vec::with_capacity(record.len());
        for (column, value) in &record {
            columns.push(column.as_str());
            values.push(value);
        }
        let placeholders = (1..=values.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING id::text",
            columns.join(", "),
        );

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for value in values {
            query = bind_value!(query, value);
        }
        let id = query.fetch_one(&self.pool).await?;
        Ok(id)
    }

    async fn delete(&self, table: &str, predicate: Predicate) -> Result<u64, StorageError> {
        let sql = format!("DELETE FROM {table} WHERE {} = $1", predicate.column);
        let query = bind_value!(sqlx::query(&sql), &predicate.value);
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Decode a Postgres row into a JSON object, column by column.
fn decode_row(row: &PgRow) -> Result<Row, StorageError> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let value = match column.type_info().name() {
            "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
                .try_get::<Option<String>, _>(idx)?
                .map(Value::from),
            "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(idx)?
                .map(|v| Value::from(f64::from(v))),
            "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
            "UUID" => row
                .try_get::<Option<uuid::Uuid>, _>(idx)?
                .map(|u| Value::from(u.to_string())),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)?
                .map(|t| Value::from(t.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
                .map(|t| Value::from(t.to_string())),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(idx)?,
            other => {
                return Err(StorageError::Decode(format!(
                    "unsupported column type {other} for column {}",
                    column.name()
                )))
            }
        };
        out.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(out)
}
