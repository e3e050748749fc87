//! Convenience result type alias for AgencyDesk.

use crate::error::AppError;

/// A specialized `Result` type for AgencyDesk operations.
pub type AppResult<T> = Result<T, AppError>;
