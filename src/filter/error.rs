use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("No data supplied for update")]
    EmptyUpdate,

    #[error("Unknown {resource} field: {field}")]
    UnknownField { resource: &'static str, field: String },

    #[error("Invalid value for {field}: expected {expected}")]
    InvalidValue { field: String, expected: &'static str },

    #[error("{min} must be less than or equal to {max}")]
    InvalidRange { min: String, max: String },
}

impl FilterError {
    /// Name of the offending field, when the error concerns a single one
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterError::UnknownField { field, .. } => Some(field),
            FilterError::InvalidValue { field, .. } => Some(field),
            FilterError::EmptyUpdate | FilterError::InvalidRange { .. } => None,
        }
    }
}
