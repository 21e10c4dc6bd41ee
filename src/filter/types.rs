use serde_json::{Map, Value};

/// Field name to new value, in the order the caller supplied them
pub type AttributeSet = Map<String, Value>;

/// Sparse, ordered filter constraints for one resource kind.
///
/// Entries are expected to be validated already (see `FilterSpec::from_query`);
/// the compiler only enforces field interactions and value shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    entries: Map<String, Value>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a constraint; a replaced key keeps its original position
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl From<Map<String, Value>> for FilterSpec {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

/// Conjunctive WHERE predicates with positionally aligned bind values.
///
/// The placeholder `$n` in `fragments` binds `values[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPredicate {
    pub fragments: Vec<String>,
    pub values: Vec<Value>,
}

impl CompiledPredicate {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Predicates joined with AND, without the WHERE keyword
    pub fn clause(&self) -> String {
        self.fragments.join(" AND ")
    }

    /// `WHERE ...` or an empty string when nothing constrains the query
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clause())
        }
    }
}

/// SET assignments for a partial update with positionally aligned values
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub fragments: Vec<String>,
    pub values: Vec<Value>,
}

impl PartialUpdate {
    /// Assignments joined for a SET clause
    pub fn set_clause(&self) -> String {
        self.fragments.join(", ")
    }

    /// Next free placeholder index, for binding the row key after the values
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}
