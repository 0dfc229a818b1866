//! Book title newtype with a smart constructor.
//!
//! The title doubles as the artifact file name, so it is validated once at
//! construction and never re-checked downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Unique, filesystem-safe title of an imported book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookTitle(String);

impl BookTitle {
    /// Smart constructor: rejects empty titles and titles that would escape
    /// the artifact directory.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTitle> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidTitle::Empty);
        }
        if raw.contains(['/', '\\']) || raw == "." || raw == ".." {
            return Err(InvalidTitle::PathSeparator(raw));
        }
        if raw.contains('\0') {
            return Err(InvalidTitle::Nul);
        }
        Ok(Self(raw))
    }

    /// Title from a file path: the file name without its extension.
    ///
    /// ```
    /// use txtreader::model::BookTitle;
    ///
    /// let title = BookTitle::from_path("/books/三体.txt").unwrap();
    /// assert_eq!(title.as_str(), "三体");
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InvalidTitle> {
        let stem = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or(InvalidTitle::Empty)?;
        Self::new(stem)
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookTitle {
    type Error = InvalidTitle;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookTitle> for String {
    fn from(title: BookTitle) -> Self {
        title.0
    }
}

// ===== Error Types =====

/// Reasons a string cannot be a [`BookTitle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTitle {
    /// Empty or whitespace-only.
    #[error("Book title cannot be empty")]
    Empty,
    /// Contains a path separator or is a relative path component.
    #[error("Book title cannot contain path separators: {0}")]
    PathSeparator(String),
    /// Contains a NUL byte.
    #[error("Book title cannot contain NUL")]
    Nul,
}

// ===== Tests =====
