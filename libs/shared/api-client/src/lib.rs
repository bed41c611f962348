pub mod clinic;

pub use clinic::{ApiError, ClinicApiClient};
