//! Book import: encoding detection, normalization and registration.
//!
//! Import is a blocking, synchronous operation. It commits in three steps so
//! a failure never leaves a catalog record without its artifact, or an
//! artifact without its record:
//!
//! 1. stage the normalized lines in a temporary file next to the artifacts
//! 2. insert the catalog record (dropping the staged file on failure)
//! 3. rename the staged file into place (deleting the record on failure)

pub mod encoding;
pub mod normalize;

pub use encoding::{CharsetDetector, StatisticalDetector, TextEncoding};
pub use normalize::{normalize_lines, NormalizedText, Normalizer};

use crate::library::{ArtifactStore, Catalog};
use crate::model::{
    AppError, BookRecord, BookTitle, CatalogError, EncodingError, InputError, StorageError,
};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Everything that can abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read or yielded no lines.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The file's charset is undeterminable or unsupported.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The title is taken or the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The artifact could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Input(err) => AppError::Input(err),
            ImportError::Encoding(err) => AppError::Encoding(err),
            ImportError::Catalog(err) => AppError::Catalog(err),
            ImportError::Storage(err) => AppError::Storage(err),
        }
    }
}

/// Import the file at `path` as a new book.
///
/// The title is the file name without its extension; the stored length is
/// the number of non-empty lines after decoding.
///
/// # Errors
///
/// See [`ImportError`]. Nothing is left behind on failure.
pub fn import_book(
    path: &Path,
    normalizer: &Normalizer,
    catalog: &dyn Catalog,
    artifacts: &ArtifactStore,
) -> Result<BookRecord, ImportError> {
    let title = BookTitle::from_path(path).map_err(|_| InputError::InvalidFileName {
        path: path.to_path_buf(),
    })?;

    let normalized = normalizer.normalize_file(path)?;
    if normalized.lines.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        }
        .into());
    }

    let staged = artifacts.stage(&title, &normalized.lines)?;
    let record = catalog.create(&title, normalized.lines.len())?;

    if let Err(err) = staged.commit() {
        if let Err(rollback) = catalog.delete_by_title(&title) {
            warn!(title = %title, error = %rollback, "Failed to roll back catalog record");
        }
        return Err(err.into());
    }

    info!(
        title = %title,
        lines = record.length,
        encoding = normalized.encoding.encoding().name(),
        "Imported book"
    );
    Ok(record)
}
