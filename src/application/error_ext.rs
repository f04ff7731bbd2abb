//! Path context for chart file I/O.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Turns a bare `io::Error` from the `FileSystem` boundary into
/// `OperationFailed`, naming what `ChartService` was doing and to which file.
pub trait IoResultExt<T> {
    /// ```ignore
    /// let content = fs.read_to_string(path).with_path_context("read chart", path)?;
    /// // error: read chart: org/chart.toml
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
