//! Error conversion helpers for reading record files
//!
//! Extension traits that attach the offending path to I/O and JSON errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read records", &path)?;
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

/// Extension trait turning JSON decode failures into `InvalidInput`.
pub trait JsonResultExt<T> {
    fn invalid_input(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn invalid_input(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::InvalidInput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
