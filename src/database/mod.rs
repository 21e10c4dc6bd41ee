pub mod companies;
pub mod executor;
pub mod jobs;
pub mod manager;
pub mod models;

pub use companies::Companies;
pub use executor::{JsonRow, PgExecutor, QueryExecutor};
pub use jobs::Jobs;
pub use manager::{DatabaseError, DatabaseManager};
