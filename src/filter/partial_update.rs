use serde_json::Value;

use super::column_map::ColumnMap;
use super::error::FilterError;
use super::types::{AttributeSet, PartialUpdate};

/// Turn a set of changed fields into `"column" = $n` assignments.
///
/// Keys are resolved through `columns` only, so a column name in the output is
/// always one that was registered ahead of time. Order follows `attributes`.
///
/// ```ignore
/// // {firstName: "Aliya", age: 32} with firstName -> first_name
/// // fragments: ["\"first_name\" = $1", "\"age\" = $2"], values: ["Aliya", 32]
/// ```
pub fn sql_for_partial_update(
    attributes: &AttributeSet,
    columns: &ColumnMap,
) -> Result<PartialUpdate, FilterError> {
    if attributes.is_empty() {
        return Err(FilterError::EmptyUpdate);
    }

    let mut fragments = Vec::with_capacity(attributes.len());
    let mut values: Vec<Value> = Vec::with_capacity(attributes.len());

    for (field, value) in attributes {
        let column = columns.resolve(field)?;
        values.push(value.clone());
        fragments.push(format!("\"{}\" = ${}", column, values.len()));
    }

    Ok(PartialUpdate { fragments, values })
}
