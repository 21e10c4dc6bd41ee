use serde_json::Value;

use super::error::FilterError;
use super::resource::{FilterField, Predicate, ResourceKind};
use super::types::{CompiledPredicate, FilterSpec};

/// Compiles a `FilterSpec` into parameterized WHERE predicates.
///
/// Only predicates that bind a value consume a placeholder, so `$n` always
/// refers to the n-th entry of the value list.
pub struct FilterWhere {
    kind: ResourceKind,
    param_values: Vec<Value>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            param_values: vec![],
            conditions: vec![],
        }
    }

    pub fn generate(kind: ResourceKind, spec: &FilterSpec) -> Result<CompiledPredicate, FilterError> {
        let mut filter_where = Self::new(kind);
        for (key, value) in spec.iter() {
            filter_where.add(key, value)?;
        }
        let compiled = filter_where.finish();
        tracing::debug!(
            resource = kind.name(),
            clause = %compiled.clause(),
            values = compiled.values.len(),
            "compiled filter"
        );
        Ok(compiled)
    }

    fn add(&mut self, key: &str, value: &Value) -> Result<(), FilterError> {
        let field = self.kind.filter_field(key).ok_or_else(|| FilterError::UnknownField {
            resource: self.kind.name(),
            field: key.to_string(),
        })?;

        match field.predicate {
            Predicate::Substring => {
                let text = match value {
                    Value::String(s) => s,
                    _ => return Err(invalid(field)),
                };
                let param = self.param(Value::String(format!("%{}%", text)));
                self.conditions.push(format!("\"{}\" ILIKE {}", field.column, param));
            }
            Predicate::AtLeast | Predicate::AtMost => {
                if !value.is_number() {
                    return Err(invalid(field));
                }
                let op = if field.predicate == Predicate::AtLeast { ">=" } else { "<=" };
                let param = self.param(value.clone());
                self.conditions.push(format!("\"{}\" {} {}", field.column, op, param));
            }
            Predicate::Positive => match value {
                Value::Bool(true) => self.conditions.push(format!("\"{}\" > 0", field.column)),
                // false places no constraint on the column
                Value::Bool(false) => {}
                _ => return Err(invalid(field)),
            },
        }
        Ok(())
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }

    fn finish(self) -> CompiledPredicate {
        CompiledPredicate {
            fragments: self.conditions,
            values: self.param_values,
        }
    }
}

fn invalid(field: &FilterField) -> FilterError {
    FilterError::InvalidValue {
        field: field.name.to_string(),
        expected: field.predicate.expected(),
    }
}

/// Compile `spec` for `kind`; an empty spec matches every row
pub fn compile(kind: ResourceKind, spec: &FilterSpec) -> Result<CompiledPredicate, FilterError> {
    FilterWhere::generate(kind, spec)
}
