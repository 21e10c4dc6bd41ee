pub mod column_map;
pub mod error;
pub mod filter_where;
pub mod partial_update;
pub mod resource;
pub mod types;
mod validate;

pub use column_map::ColumnMap;
pub use error::FilterError;
pub use filter_where::{compile, FilterWhere};
pub use partial_update::sql_for_partial_update;
pub use resource::{FilterField, Predicate, ResourceKind};
pub use types::*;
