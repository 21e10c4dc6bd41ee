// Caller-side validation of search filters taken from a query string

use serde_json::Value;

use super::error::FilterError;
use super::resource::{Predicate, ResourceKind};
use super::types::FilterSpec;

impl FilterSpec {
    /// Build a validated filter from raw query-string pairs.
    ///
    /// Rejects fields outside the resource's vocabulary, coerces numeric and
    /// boolean values, and checks that a lower bound does not exceed an upper
    /// bound on the same column. Pair order is preserved.
    pub fn from_query<I, K, V>(kind: ResourceKind, pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = FilterSpec::new();

        for (key, raw) in pairs {
            let key = key.as_ref();
            let raw = raw.as_ref();
            let field = kind.filter_field(key).ok_or_else(|| FilterError::UnknownField {
                resource: kind.name(),
                field: key.to_string(),
            })?;

            let invalid = || FilterError::InvalidValue {
                field: key.to_string(),
                expected: field.predicate.expected(),
            };

            let value = match field.predicate {
                Predicate::Substring => {
                    if raw.is_empty() {
                        return Err(invalid());
                    }
                    Value::String(raw.to_string())
                }
                Predicate::AtLeast | Predicate::AtMost => {
                    let n: u32 = raw.trim().parse().map_err(|_| invalid())?;
                    Value::from(n)
                }
                Predicate::Positive => match raw.trim() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => return Err(invalid()),
                },
            };

            spec.insert(key, value);
        }

        spec.check_ranges(kind)?;
        Ok(spec)
    }

    fn check_ranges(&self, kind: ResourceKind) -> Result<(), FilterError> {
        let fields = kind.filter_fields();
        for lower in fields.iter().filter(|f| f.predicate == Predicate::AtLeast) {
            let upper = fields
                .iter()
                .find(|f| f.predicate == Predicate::AtMost && f.column == lower.column);
            let Some(upper) = upper else { continue };

            let min = self.get(lower.name).and_then(Value::as_u64);
            let max = self.get(upper.name).and_then(Value::as_u64);
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(FilterError::InvalidRange {
                        min: lower.name.to_string(),
                        max: upper.name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerces_company_values() {
        let spec = FilterSpec::from_query(
            ResourceKind::Company,
            vec![("name", "net"), ("minEmployees", "10"), ("maxEmployees", "20")],
        )
        .unwrap();
        let entries: Vec<_> = spec.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("name".to_string(), json!("net")),
                ("minEmployees".to_string(), json!(10)),
                ("maxEmployees".to_string(), json!(20)),
            ]
        );
    }

    #[test]
    fn test_coerces_has_equity() {
        let spec = FilterSpec::from_query(ResourceKind::Job, vec![("hasEquity", "false")]).unwrap();
        assert_eq!(spec.get("hasEquity"), Some(&json!(false)));

        let err = FilterSpec::from_query(ResourceKind::Job, vec![("hasEquity", "maybe")]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue { field: "hasEquity".to_string(), expected: "a boolean" }
        );
    }

    #[test]
    fn test_rejects_non_numeric_and_negative_bounds() {
        for raw in ["abc", "-1", "1.5"] {
            let result = FilterSpec::from_query(ResourceKind::Job, vec![("minSalary", raw)]);
            assert!(matches!(result, Err(FilterError::InvalidValue { .. })), "accepted {}", raw);
        }
    }

    #[test]
    fn test_rejects_min_above_max() {
        let err = FilterSpec::from_query(
            ResourceKind::Company,
            vec![("minEmployees", "5"), ("maxEmployees", "1")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidRange { min: "minEmployees".to_string(), max: "maxEmployees".to_string() }
        );
    }

    #[test]
    fn test_equal_bounds_are_allowed() {
        let spec = FilterSpec::from_query(
            ResourceKind::Company,
            vec![("maxEmployees", "3"), ("minEmployees", "3")],
        );
        assert!(spec.is_ok());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = FilterSpec::from_query(ResourceKind::Company, vec![("nameLike", "c")]).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownField { resource: "company", field: "nameLike".to_string() }
        );
    }
}
