//! The library: catalog, artifacts and the operations the pager calls.
//!
//! [`Library`] is the presentation-layer entry point. It owns one shared
//! [`PositionWriter`] so that at most one deferred position write is pending
//! across all sessions.

pub mod artifact;
pub mod catalog;

pub use artifact::{ArtifactStore, StagedArtifact};
pub use catalog::{Catalog, JsonCatalog, MemoryCatalog};

use crate::config::ResolvedConfig;
use crate::import::{import_book, ImportError, Normalizer};
use crate::model::{AppError, BookRecord, BookSummary, BookTitle, CatalogError};
use crate::position::{spawn_position_writer, PositionWriter};
use crate::session::ReadingSession;
use crate::text::{ChapterIndexer, ChapterMarker, Document, Viewport};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Imported books and the means to read them.
#[derive(Debug)]
pub struct Library {
    catalog: Arc<dyn Catalog>,
    artifacts: ArtifactStore,
    normalizer: Normalizer,
    indexer: ChapterIndexer,
    writer: Arc<PositionWriter>,
}

impl Library {
    /// Assemble a library from its parts and start the position writer.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the writer thread cannot be spawned.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        artifacts: ArtifactStore,
        normalizer: Normalizer,
        indexer: ChapterIndexer,
        debounce: Duration,
    ) -> std::io::Result<Self> {
        let writer = Arc::new(spawn_position_writer(Arc::clone(&catalog), debounce)?);
        Ok(Self {
            catalog,
            artifacts,
            normalizer,
            indexer,
            writer,
        })
    }

    /// Open the on-disk library described by `config`.
    ///
    /// # Errors
    ///
    /// - [`crate::config::ConfigError::InvalidPattern`] for a bad heading pattern
    /// - [`crate::model::StorageError`] for an unreadable catalog file
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, AppError> {
        let indexer = config.chapter_indexer()?;
        let catalog = JsonCatalog::open(config.catalog_path())?;
        let library = Self::new(
            Arc::new(catalog),
            ArtifactStore::new(config.artifact_dir()),
            Normalizer::with_sample_bytes(config.detection_sample_bytes),
            indexer,
            config.position_debounce(),
        )?;
        info!(dir = %config.library_dir.display(), "Opened library");
        Ok(library)
    }

    /// Import the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`ImportError`].
    pub fn import(&self, path: &Path) -> Result<BookRecord, ImportError> {
        import_book(path, &self.normalizer, self.catalog.as_ref(), &self.artifacts)
    }

    /// Open a book for reading at its stored position.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown title, or
    /// [`CatalogError::Storage`] if the artifact cannot be read.
    pub fn open(&self, title: &BookTitle, viewport: Viewport) -> Result<ReadingSession, CatalogError> {
        // A position still pending for a previous session must land first.
        self.writer.flush();

        let record = self.catalog.get_by_title(title)?;
        let lines = self.artifacts.read(title)?;
        if lines.len() != record.length {
            warn!(
                title = %title,
                stored = record.length,
                actual = lines.len(),
                "Artifact length differs from catalog record"
            );
        }
        Ok(ReadingSession::open(
            record,
            Document::new(lines),
            &self.indexer,
            viewport,
            Arc::clone(&self.writer),
        ))
    }

    /// Chapter headings of a book, without opening a session.
    ///
    /// # Errors
    ///
    /// As [`Library::open`].
    pub fn chapters(&self, title: &BookTitle) -> Result<Vec<ChapterMarker>, CatalogError> {
        self.catalog.get_by_title(title)?;
        let lines = self.artifacts.read(title)?;
        Ok(self.indexer.index(&lines))
    }

    /// Delete a book: catalog record first, then its artifact.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for an unknown title; storage failures.
    pub fn remove(&self, title: &BookTitle) -> Result<(), CatalogError> {
        self.writer.flush();
        self.catalog.delete_by_title(title)?;
        if !self.artifacts.remove(title)? {
            warn!(title = %title, "Removed book had no artifact");
        }
        info!(title = %title, "Removed book");
        Ok(())
    }

    /// All books with their progress, in import order.
    ///
    /// # Errors
    ///
    /// Storage failures of the catalog.
    pub fn list(&self) -> Result<Vec<BookSummary>, CatalogError> {
        self.writer.flush();
        Ok(self
            .catalog
            .list_all()?
            .iter()
            .map(BookSummary::from)
            .collect())
    }

    /// Persist any pending position write now.
    pub fn flush_positions(&self) {
        self.writer.flush();
    }
}
