//! Error types for txtreader.
//!
//! Errors are `thiserror` enums that compose through `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned to `main`
//!   - [`InputError`] - Source file missing, unreadable, or empty after normalization
//!   - [`EncodingError`] - Charset could not be determined or is not supported
//!   - [`CatalogError`] - Duplicate title, unknown title, or storage failure
//!     - [`StorageError`] - Catalog/artifact filesystem I/O and (de)serialization
//!
//! Nothing here is retried automatically. The only deferred write (the reading
//! position) is superseded by later navigation instead.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the file being imported.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The file being imported has an unusable character encoding.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Catalog operation failed (duplicate title, unknown title, storage).
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Artifact storage failed outside of a catalog operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Navigation inside a reading session failed.
    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered while reading a candidate book file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use txtreader::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound { path: PathBuf::from("/tmp/missing.txt") };
    /// assert!(err.to_string().contains("/tmp/missing.txt"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The path has no file stem that can serve as a book title.
    #[error("Cannot derive a book title from {path}")]
    InvalidFileName {
        /// The offending path.
        path: PathBuf,
    },

    /// Every line of the file was empty after decoding.
    #[error("No readable lines in {path}")]
    Empty {
        /// The imported path.
        path: PathBuf,
    },

    /// Any other I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Character-encoding failures during import.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The detector produced no answer for the sample.
    #[error("Unable to determine the file's character encoding")]
    Undetermined,

    /// The detector named a charset outside the UTF and GB families.
    ///
    /// ```
    /// use txtreader::model::error::EncodingError;
    ///
    /// let err = EncodingError::Unsupported { charset: "Shift_JIS".to_string() };
    /// assert_eq!(err.to_string(), "Unknown encoding: Shift_JIS");
    /// ```
    #[error("Unknown encoding: {charset}")]
    Unsupported {
        /// Label reported by the detector.
        charset: String,
    },
}

/// Errors from the persistent book catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A book with this title is already registered.
    #[error("A book titled '{title}' already exists")]
    DuplicateTitle {
        /// The conflicting title.
        title: String,
    },

    /// No book with this title is registered.
    #[error("No book titled '{title}'")]
    NotFound {
        /// The missing title.
        title: String,
    },

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Filesystem and serialization failures of the catalog and artifact store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O failure on a specific path.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file could not be encoded or decoded.
    #[error("Catalog serialization failed for {path}: {source}")]
    Serialization {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory catalog lock was poisoned by a panicking writer.
    #[error("Catalog lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_converts_to_app_error() {
        let err: AppError = InputError::FileNotFound {
            path: PathBuf::from("a.txt"),
        }
        .into();
        assert!(matches!(err, AppError::Input(InputError::FileNotFound { .. })));
    }

    #[test]
    fn storage_error_converts_through_catalog_error() {
        let storage = StorageError::io("catalog.json", std::io::Error::other("disk full"));
        let catalog: CatalogError = storage.into();
        assert!(matches!(catalog, CatalogError::Storage(_)));
        assert!(catalog.to_string().contains("catalog.json"));
    }

    #[test]
    fn duplicate_title_message_names_title() {
        let err = CatalogError::DuplicateTitle {
            title: "三体".to_string(),
        };
        assert_eq!(err.to_string(), "A book titled '三体' already exists");
    }

    #[test]
    fn io_error_converts_to_input_error() {
        let err: InputError = std::io::Error::other("boom").into();
        assert!(matches!(err, InputError::Io(_)));
    }
}
