//! Error types for CRT operations.

use thiserror::Error;

/// Error type for CRT operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A parameter is out of range or not finite.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer shape error from crt-core.
    #[error(transparent)]
    Core(#[from] crt_core::Error),
}

impl OpsError {
    /// Returns `true` if the error is a buffer or field shape disagreement.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_dimension_mismatch())
    }
}

/// Result type for CRT operations.
pub type OpsResult<T> = Result<T, OpsError>;
