//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod chart;
pub mod error;
pub mod error_ext;
pub mod script;
pub mod services;

pub use chart::{ChartFile, EmployeeRecord, RootRecord};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use script::{run_script, Outcome};
