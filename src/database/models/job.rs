use serde::{Deserialize, Serialize};

use crate::filter::FilterError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// NUMERIC rendered as text, e.g. "0.7"
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Job as listed under its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.title.is_empty() {
            return Err(invalid("title", "a non-empty string"));
        }
        if self.company_handle.is_empty() {
            return Err(invalid("companyHandle", "a non-empty string"));
        }
        validate_common(self.salary, self.equity)
    }
}

/// Shape check for a job PATCH body; id and companyHandle cannot change
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

impl JobUpdate {
    /// Fields a PATCH may change but not set to null
    pub const NOT_NULL: &'static [&'static str] = &["title"];

    pub fn validate(&self) -> Result<(), FilterError> {
        if matches!(self.title.as_deref(), Some("")) {
            return Err(invalid("title", "a non-empty string"));
        }
        validate_common(self.salary, self.equity)
    }
}

fn validate_common(salary: Option<i32>, equity: Option<f64>) -> Result<(), FilterError> {
    if matches!(salary, Some(s) if s < 0) {
        return Err(invalid("salary", "a non-negative integer"));
    }
    if matches!(equity, Some(e) if !(0.0..=1.0).contains(&e)) {
        return Err(invalid("equity", "a number between 0 and 1"));
    }
    Ok(())
}

fn invalid(field: &str, expected: &'static str) -> FilterError {
    FilterError::InvalidValue {
        field: field.to_string(),
        expected,
    }
}
