pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyUpdate, NewCompany};
pub use job::{CompanyJob, Job, JobUpdate, NewJob};
