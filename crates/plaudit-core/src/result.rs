//! Result type aliases for Plaudit.

use crate::PlauditError;

/// A specialized `Result` type for Plaudit operations.
pub type PlauditResult<T> = Result<T, PlauditError>;
