use serde::{Deserialize, Serialize};

use crate::filter::FilterError;

use super::job::CompanyJob;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with the jobs it offers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.handle.is_empty() || self.handle.len() > 25 {
            return Err(invalid("handle", "between 1 and 25 characters"));
        }
        if self.name.is_empty() {
            return Err(invalid("name", "a non-empty string"));
        }
        validate_common(self.num_employees, self.logo_url.as_deref())
    }
}

/// Shape check for a company PATCH body; the body itself is applied as given
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    /// Fields a PATCH may change but not set to null
    pub const NOT_NULL: &'static [&'static str] = &["name", "description"];

    pub fn validate(&self) -> Result<(), FilterError> {
        if matches!(self.name.as_deref(), Some("")) {
            return Err(invalid("name", "a non-empty string"));
        }
        validate_common(self.num_employees, self.logo_url.as_deref())
    }
}

fn validate_common(num_employees: Option<i32>, logo_url: Option<&str>) -> Result<(), FilterError> {
    if matches!(num_employees, Some(n) if n < 0) {
        return Err(invalid("numEmployees", "a non-negative integer"));
    }
    if let Some(url) = logo_url {
        if url::Url::parse(url).is_err() {
            return Err(invalid("logoUrl", "a URL"));
        }
    }
    Ok(())
}

fn invalid(field: &str, expected: &'static str) -> FilterError {
    FilterError::InvalidValue {
        field: field.to_string(),
        expected,
    }
}
