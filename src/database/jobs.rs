use std::sync::Arc;

use serde_json::{json, Value};

use crate::filter::{compile, sql_for_partial_update, AttributeSet, FilterSpec, ResourceKind};

use super::executor::{decode_row, decode_rows, QueryExecutor};
use super::manager::DatabaseError;
use super::models::{Job, NewJob};

const JOB_COLUMNS: &str = r#"id,
               title,
               salary,
               equity::text AS equity,
               company_handle AS "companyHandle""#;

/// Data access for jobs
#[derive(Clone)]
pub struct Jobs {
    executor: Arc<dyn QueryExecutor>,
}

impl Jobs {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Insert a job for an existing company
    pub async fn create(&self, data: &NewJob) -> Result<Job, DatabaseError> {
        let company = self
            .executor
            .fetch_optional(
                "SELECT handle FROM companies WHERE handle = $1",
                &[json!(data.company_handle)],
            )
            .await?;
        if company.is_none() {
            return Err(DatabaseError::InvalidReference(format!(
                "No company: {}",
                data.company_handle
            )));
        }

        let query = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            JOB_COLUMNS
        );
        let params = [
            json!(data.title),
            json!(data.salary),
            json!(data.equity),
            json!(data.company_handle),
        ];

        let row = self
            .executor
            .fetch_optional(&query, &params)
            .await?
            .ok_or_else(|| DatabaseError::Decode("INSERT returned no row".to_string()))?;
        decode_row(row)
    }

    /// All jobs matching `filter`, ordered by title
    pub async fn find_all(&self, filter: &FilterSpec) -> Result<Vec<Job>, DatabaseError> {
        let predicate = compile(ResourceKind::Job, filter)?;
        let query = format!(
            "SELECT {}
             FROM jobs
             {}
             ORDER BY title",
            JOB_COLUMNS,
            predicate.where_sql()
        );

        let rows = self.executor.fetch_all(&query, &predicate.values).await?;
        decode_rows(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Job, DatabaseError> {
        let query = format!(
            "SELECT {}
             FROM jobs
             WHERE id = $1",
            JOB_COLUMNS
        );
        let row = self
            .executor
            .fetch_optional(&query, &[json!(id)])
            .await?
            .ok_or_else(|| not_found(id))?;
        decode_row(row)
    }

    /// Apply a partial update to title, salary or equity
    pub async fn update(&self, id: i32, data: &AttributeSet) -> Result<Job, DatabaseError> {
        let update = sql_for_partial_update(data, ResourceKind::Job.update_columns())?;
        let query = format!(
            "UPDATE jobs
             SET {}
             WHERE id = ${}
             RETURNING {}",
            update.set_clause(),
            update.next_placeholder(),
            JOB_COLUMNS
        );

        let mut params = update.values;
        params.push(Value::from(id));

        let row = self
            .executor
            .fetch_optional(&query, &params)
            .await?
            .ok_or_else(|| not_found(id))?;
        decode_row(row)
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        self.executor
            .fetch_optional("DELETE FROM jobs WHERE id = $1 RETURNING id", &[json!(id)])
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("No job: {}", id))
}
