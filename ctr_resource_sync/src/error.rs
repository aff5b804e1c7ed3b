//! Error types for the CTR resource sync core
//!
//! Every error here is locally recoverable: the lifecycle controller aborts the
//! current operation, leaves all cache tiers in their pre-operation state and
//! hands the error back to the caller for display.

use std::fmt;

use crate::codec::TextureFormat;

/// Result type for CTR resource operations
pub type Result<T> = std::result::Result<T, Error>;

/// CTR resource errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The format has no decoder, or cannot be produced from RGBA8
    UnsupportedFormat(TextureFormat),

    /// Width/height (or a buffer length derived from them) is not usable
    InvalidDimensions(String),

    /// Old and new images passed to the compositor differ in size
    DimensionMismatch {
        /// Size of the previous image (width, height)
        expected: (u32, u32),
        /// Size of the replacement image (width, height)
        actual: (u32, u32),
    },

    /// Face, mip level or similar index is outside the valid range
    IndexOutOfRange {
        /// What was indexed ("face", "mip level", ...)
        what: &'static str,
        /// Requested index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    /// The name is already used by a different live resource
    NameCollision(String),

    /// No resource with this name exists in the collection
    ResourceNotFound(String),

    /// Empty or otherwise unusable resource name
    InvalidName(String),

    /// Another lifecycle operation currently holds this name
    NameBusy(String),

    /// The operation was cancelled before any cache mutation
    Cancelled,

    /// Image file could not be read or written
    ImageIo(String),

    /// Initialization failed (runtime, global indices)
    InitializationFailed(String),

    /// Collaborator or lock failure (renderer, poisoned mutex, ...)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFormat(format) => write!(f, "Unsupported format: {:?}", format),
            Error::InvalidDimensions(msg) => write!(f, "Invalid dimensions: {}", msg),
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Error::IndexOutOfRange { what, index, len } => {
                write!(f, "Index out of range: {} {} (count = {})", what, index, len)
            }
            Error::NameCollision(name) => write!(f, "Name collision: '{}' is already in use", name),
            Error::ResourceNotFound(name) => write!(f, "Resource not found: '{}'", name),
            Error::InvalidName(msg) => write!(f, "Invalid name: {}", msg),
            Error::NameBusy(name) => write!(f, "Resource '{}' is busy with another operation", name),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::ImageIo(msg) => write!(f, "Image I/O error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageIo(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
