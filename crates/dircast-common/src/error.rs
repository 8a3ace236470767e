//! Common error types used throughout dircast.
//!
//! This module provides a unified error type covering the per-request
//! failure cases of the content-directory service: invalid action
//! arguments, unknown object ids, browse attempts on non-containers, and
//! I/O failures from the virtual file layer.

/// Common error type for dircast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An action argument was malformed or unrecognized.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested object id is not present in the current catalog.
    #[error("No such object: {0}")]
    NoSuchObject(u32),

    /// A direct-children browse was requested on an item.
    #[error("Object {0} is not browsable")]
    NotBrowsable(u32),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was attempted on a closed file handle.
    #[error("File handle is closed")]
    Closed,

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new InvalidArgument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new NoSuchObject error.
    pub fn no_such_object(id: u32) -> Self {
        Self::NoSuchObject(id)
    }

    /// Create a new NotBrowsable error.
    pub fn not_browsable(id: u32) -> Self {
        Self::NotBrowsable(id)
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
