//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod book;
pub mod error;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use book::{progress_percent, BookRecord, BookSummary};
pub use error::{AppError, CatalogError, EncodingError, InputError, StorageError};
pub use identifiers::{BookTitle, InvalidTitle};
pub use key_action::ReaderAction;
