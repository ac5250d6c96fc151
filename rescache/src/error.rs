//! Error types for the rescache library.
//!
//! This module provides the error hierarchy for resolution, extraction,
//! configuration and cache lifecycle operations, using `thiserror` for
//! ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a rescache error.
///
/// # Examples
///
/// ```
/// use rescache::{Error, Result};
///
/// fn example_operation() -> Result<u64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the rescache library.
#[derive(Debug, Error)]
pub enum Error {
    /// The resolver has been closed and its cache directory removed.
    #[error("file resolver closed")]
    ResolverClosed,

    /// A path does not exist, neither in the resource source nor on disk.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// An invalid path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// Reading from the source or writing into the cache failed.
    #[error("failed to extract {}: {source}", path.display())]
    Extraction {
        /// The logical path being extracted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The resource source changed underneath an extraction in progress.
    #[error("resource source changed while extracting {}: {details}", path.display())]
    SourceChanged {
        /// The logical path that could no longer be read.
        path: PathBuf,
        /// What was observed.
        details: String,
    },

    /// A resource archive could not be read.
    #[error("invalid archive {}: {reason}", path.display())]
    Archive {
        /// The archive file.
        path: PathBuf,
        /// The reason the archive was rejected.
        reason: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Wraps an I/O error raised while extracting `path`.
    pub(crate) fn extraction(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Extraction {
            path: path.into(),
            source,
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::PathNotFound { path: PathBuf::from("tree/a/d") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::PathNotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if error was caused by using a closed resolver.
    ///
    /// # Examples
    ///
    /// ```
    /// use rescache::Error;
    ///
    /// assert!(Error::ResolverClosed.is_closed());
    /// ```
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ResolverClosed)
    }
}
