use super::error::FilterError;

/// Trusted lookup from external (camelCase) field names to storage columns.
///
/// A map is closed: only registered fields may be resolved into SQL. A field
/// registered with `field` uses its external name as the column name.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    resource: &'static str,
    entries: Vec<(&'static str, &'static str)>,
}

impl ColumnMap {
    pub fn new(resource: &'static str) -> Self {
        Self { resource, entries: vec![] }
    }

    /// Register a field whose column name differs from the external name
    pub fn rename(mut self, field: &'static str, column: &'static str) -> Self {
        debug_assert!(is_identifier(column), "invalid column name: {}", column);
        self.entries.push((field, column));
        self
    }

    /// Register a field stored under its own name
    pub fn field(self, field: &'static str) -> Self {
        self.rename(field, field)
    }

    /// Registered column for a field, if any
    pub fn lookup(&self, field: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    /// Column for a field that must be registered in this map
    pub fn resolve(&self, field: &str) -> Result<&'static str, FilterError> {
        self.lookup(field).ok_or_else(|| FilterError::UnknownField {
            resource: self.resource,
            field: field.to_string(),
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
