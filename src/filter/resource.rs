use once_cell::sync::Lazy;

use super::column_map::ColumnMap;

/// Resource kinds that can be searched and partially updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Company,
    Job,
}

/// How a filter field compiles into a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `column ILIKE $n`, bound as `%value%`
    Substring,
    /// `column >= $n`
    AtLeast,
    /// `column <= $n`
    AtMost,
    /// `column > 0` when true, no constraint when false
    Positive,
}

impl Predicate {
    pub fn expected(&self) -> &'static str {
        match self {
            Predicate::Substring => "a string",
            Predicate::AtLeast | Predicate::AtMost => "a non-negative integer",
            Predicate::Positive => "a boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub column: &'static str,
    pub predicate: Predicate,
}

const COMPANY_FILTERS: &[FilterField] = &[
    FilterField { name: "name", column: "name", predicate: Predicate::Substring },
    FilterField { name: "minEmployees", column: "num_employees", predicate: Predicate::AtLeast },
    FilterField { name: "maxEmployees", column: "num_employees", predicate: Predicate::AtMost },
];

const JOB_FILTERS: &[FilterField] = &[
    FilterField { name: "title", column: "title", predicate: Predicate::Substring },
    FilterField { name: "minSalary", column: "salary", predicate: Predicate::AtLeast },
    FilterField { name: "hasEquity", column: "equity", predicate: Predicate::Positive },
];

static COMPANY_COLUMNS: Lazy<ColumnMap> = Lazy::new(|| {
    ColumnMap::new("company")
        .field("name")
        .field("description")
        .rename("numEmployees", "num_employees")
        .rename("logoUrl", "logo_url")
});

// id and companyHandle are fixed once a job exists
static JOB_COLUMNS: Lazy<ColumnMap> = Lazy::new(|| {
    ColumnMap::new("job")
        .field("title")
        .field("salary")
        .field("equity")
});

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Company => "company",
            ResourceKind::Job => "job",
        }
    }

    pub fn filter_fields(&self) -> &'static [FilterField] {
        match self {
            ResourceKind::Company => COMPANY_FILTERS,
            ResourceKind::Job => JOB_FILTERS,
        }
    }

    pub fn filter_field(&self, name: &str) -> Option<&'static FilterField> {
        self.filter_fields().iter().find(|f| f.name == name)
    }

    /// Columns that a partial update may touch
    pub fn update_columns(&self) -> &'static ColumnMap {
        match self {
            ResourceKind::Company => &COMPANY_COLUMNS,
            ResourceKind::Job => &JOB_COLUMNS,
        }
    }
}
