use std::sync::Arc;

use serde_json::{json, Value};

use crate::filter::{compile, sql_for_partial_update, AttributeSet, FilterSpec, ResourceKind};

use super::executor::{decode_row, decode_rows, QueryExecutor};
use super::manager::DatabaseError;
use super::models::{Company, CompanyDetail, CompanyJob, NewCompany};

const COMPANY_COLUMNS: &str = r#"handle,
               name,
               description,
               num_employees AS "numEmployees",
               logo_url AS "logoUrl""#;

/// Data access for companies
#[derive(Clone)]
pub struct Companies {
    executor: Arc<dyn QueryExecutor>,
}

impl Companies {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Insert a company; a taken handle is reported as a duplicate
    pub async fn create(&self, data: &NewCompany) -> Result<Company, DatabaseError> {
        let existing = self
            .executor
            .fetch_optional("SELECT handle FROM companies WHERE handle = $1", &[json!(data.handle)])
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Duplicate(format!("Duplicate company: {}", data.handle)));
        }

        let query = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COMPANY_COLUMNS
        );
        let params = [
            json!(data.handle),
            json!(data.name),
            json!(data.description),
            json!(data.num_employees),
            json!(data.logo_url),
        ];

        let row = self
            .executor
            .fetch_optional(&query, &params)
            .await?
            .ok_or_else(|| DatabaseError::Decode("INSERT returned no row".to_string()))?;
        decode_row(row)
    }

    /// All companies matching `filter`, ordered by name
    pub async fn find_all(&self, filter: &FilterSpec) -> Result<Vec<Company>, DatabaseError> {
        let predicate = compile(ResourceKind::Company, filter)?;
        let query = format!(
            "SELECT {}
             FROM companies
             {}
             ORDER BY name",
            COMPANY_COLUMNS,
            predicate.where_sql()
        );

        let rows = self.executor.fetch_all(&query, &predicate.values).await?;
        decode_rows(rows)
    }

    /// A company and its jobs
    pub async fn get(&self, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let query = format!(
            "SELECT {}
             FROM companies
             WHERE handle = $1",
            COMPANY_COLUMNS
        );
        let row = self
            .executor
            .fetch_optional(&query, &[json!(handle)])
            .await?
            .ok_or_else(|| not_found(handle))?;
        let company: Company = decode_row(row)?;

        let jobs = self
            .executor
            .fetch_all(
                "SELECT id, title, salary, equity::text AS equity
                 FROM jobs
                 WHERE company_handle = $1
                 ORDER BY id",
                &[json!(handle)],
            )
            .await?;
        let jobs: Vec<CompanyJob> = decode_rows(jobs)?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update; only provided fields change
    pub async fn update(&self, handle: &str, data: &AttributeSet) -> Result<Company, DatabaseError> {
        let update = sql_for_partial_update(data, ResourceKind::Company.update_columns())?;
        let query = format!(
            "UPDATE companies
             SET {}
             WHERE handle = ${}
             RETURNING {}",
            update.set_clause(),
            update.next_placeholder(),
            COMPANY_COLUMNS
        );

        let mut params = update.values;
        params.push(Value::String(handle.to_string()));

        let row = self
            .executor
            .fetch_optional(&query, &params)
            .await?
            .ok_or_else(|| not_found(handle))?;
        decode_row(row)
    }

    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        self.executor
            .fetch_optional(
                "DELETE FROM companies WHERE handle = $1 RETURNING handle",
                &[json!(handle)],
            )
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found(handle))
    }
}

fn not_found(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}
