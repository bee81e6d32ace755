//! Error types for I/O operations.

use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input could not be read or decoded: missing file, unknown
    /// format, or corrupt data.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The output could not be encoded or written: unknown extension,
    /// unwritable path, or dimensions the format cannot hold.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Buffer shape error from crt-core.
    #[error(transparent)]
    Core(#[from] crt_core::Error),
}

impl IoError {
    /// Returns `true` for decode-side failures.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError(_))
    }

    /// Returns `true` for encode-side failures.
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::EncodeError(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
