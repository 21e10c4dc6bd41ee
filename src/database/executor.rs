use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow, PgTypeInfo};
use sqlx::{Column, PgPool, Row, TypeInfo};

use super::manager::DatabaseError;

/// A row as a JSON object keyed by column name (or alias)
pub type JsonRow = Map<String, Value>;

/// Runs a parameterized statement and returns its rows.
///
/// `$n` placeholders in `query` bind `params[n - 1]`.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_all(&self, query: &str, params: &[Value]) -> Result<Vec<JsonRow>, DatabaseError>;

    async fn fetch_optional(&self, query: &str, params: &[Value]) -> Result<Option<JsonRow>, DatabaseError> {
        Ok(self.fetch_all(query, params).await?.into_iter().next())
    }
}

/// `QueryExecutor` backed by a Postgres pool
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
    log_queries: bool,
}

impl PgExecutor {
    pub fn new(pool: PgPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_all(&self, query: &str, params: &[Value]) -> Result<Vec<JsonRow>, DatabaseError> {
        if self.log_queries {
            tracing::debug!("SQL: {} -- params: {:?}", query.trim(), params);
        }

        let mut q = sqlx::query(query);
        for value in params {
            q = bind_param(q, value);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Query failed: {}", e);
            DatabaseError::Sqlx(e)
        })?;

        rows.iter().map(row_to_json).collect()
    }
}

/// Bind parameter to SQL query
fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        // int8 NULL converts to integer, numeric and text columns by assignment
        Value::Null => q.bind(None::<i64>),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}

fn row_to_json(row: &PgRow) -> Result<JsonRow, DatabaseError> {
    let mut record = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = extract_column_value(row, i, column.type_info())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// Extract typed value from database column
fn extract_column_value(row: &PgRow, index: usize, type_info: &PgTypeInfo) -> Result<Value, DatabaseError> {
    let type_name = type_info.name();

    let value = match type_name {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(Value::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        other => {
            return Err(DatabaseError::Decode(format!(
                "unsupported column type {} (cast it to text in the query)",
                other
            )))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Deserialize a JSON row into a model
pub fn decode_row<T: serde::de::DeserializeOwned>(row: JsonRow) -> Result<T, DatabaseError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DatabaseError::Decode(e.to_string()))
}

pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<JsonRow>) -> Result<Vec<T>, DatabaseError> {
    rows.into_iter().map(decode_row).collect()
}
