//! Attaching file paths to I/O failures.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Turns a bare `io::Error` into `ApplicationError::OperationFailed` naming
/// the file and what was being done with it, e.g. "read chart: org.toml".
///
/// The original `io::Error` stays reachable as the source, so the CLI can
/// still tell a missing chart from other I/O trouble.
pub trait IoResultExt<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OperationFailed {
            context: format!("{action}: {}", path.display()),
            source: Box::new(source),
        })
    }
}
