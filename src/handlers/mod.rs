// Route handlers: public reads, admin-only writes (see app.rs for guards)

use std::borrow::Cow;

use serde_json::Value;

use crate::error::ApiError;
use crate::filter::{AttributeSet, FilterError};

pub mod companies;
pub mod jobs;

/// Decoded `key=value` pairs of a raw query string, in order
pub(crate) fn query_pairs(query: Option<&str>) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()).collect()
}

/// A PATCH body must be a non-empty JSON object, and the fields in
/// `not_null` may be changed but never cleared
pub(crate) fn update_body(body: Value, not_null: &[&str]) -> Result<AttributeSet, ApiError> {
    let attributes = match body {
        Value::Object(attributes) if attributes.is_empty() => return Err(FilterError::EmptyUpdate.into()),
        Value::Object(attributes) => attributes,
        _ => return Err(ApiError::bad_request("Request body must be a JSON object")),
    };

    if let Some(field) = not_null.iter().find(|field| attributes.get(**field) == Some(&Value::Null)) {
        return Err(FilterError::InvalidValue {
            field: field.to_string(),
            expected: "a non-null value",
        }
        .into());
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_decode_and_keep_order() {
        let pairs = query_pairs(Some("name=c%204&minEmployees=2&name2=a+b"));
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "c 4".to_string()),
                ("minEmployees".to_string(), "2".to_string()),
                ("name2".to_string(), "a b".to_string()),
            ]
        );
        assert!(query_pairs(None).is_empty());
    }

    #[test]
    fn test_update_body_shapes() {
        assert!(update_body(json!({"name": "x"}), &[]).is_ok());
        assert_eq!(update_body(json!({}), &[]).unwrap_err().error_code(), "VALIDATION_ERROR");
        assert_eq!(update_body(json!([1]), &[]).unwrap_err().error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_update_body_rejects_clearing_required_fields() {
        let err = update_body(json!({"logoUrl": null, "name": null}), &["name"]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "Invalid value for name: expected a non-null value");

        assert!(update_body(json!({"logoUrl": null}), &["name"]).is_ok());
    }
}
