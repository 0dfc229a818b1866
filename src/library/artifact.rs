//! Normalized-text artifacts: one UTF-8 file per book.

use crate::model::{BookTitle, StorageError};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const ARTIFACT_EXTENSION: &str = "txt";

/// Directory of `<title>.txt` files holding each book's normalized lines.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic artifact path for `title`.
    pub fn path_for(&self, title: &BookTitle) -> PathBuf {
        self.dir
            .join(format!("{}.{ARTIFACT_EXTENSION}", title.as_str()))
    }

    /// Write `lines` to a temporary file beside the final artifact.
    ///
    /// Nothing is visible under the artifact name until
    /// [`StagedArtifact::commit`]; dropping the staged artifact deletes it.
    pub fn stage(&self, title: &BookTitle, lines: &[String]) -> Result<StagedArtifact, StorageError> {
        fs::create_dir_all(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;

        let file = NamedTempFile::new_in(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        let staged_path = file.path().to_path_buf();
        let write = || -> std::io::Result<()> {
            let mut writer = BufWriter::new(file.as_file());
            for line in lines {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            file.as_file().sync_all()
        };
        write().map_err(|err| StorageError::io(&staged_path, err))?;

        Ok(StagedArtifact {
            file,
            target: self.path_for(title),
        })
    }

    /// Read a book's lines back in full, exactly as [`stage`](Self::stage)
    /// wrote them.
    ///
    /// Only `\n` separates lines; a carriage return is line content.
    pub fn read(&self, title: &BookTitle) -> Result<Vec<String>, StorageError> {
        let path = self.path_for(title);
        let contents = fs::read_to_string(&path).map_err(|err| StorageError::io(&path, err))?;
        Ok(contents.split_terminator('\n').map(str::to_owned).collect())
    }

    /// Delete a book's artifact. Returns `false` if none existed.
    pub fn remove(&self, title: &BookTitle) -> Result<bool, StorageError> {
        let path = self.path_for(title);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::io(&path, err)),
        }
    }
}

/// An artifact written to a temporary name, awaiting [`commit`](Self::commit).
#[derive(Debug)]
pub struct StagedArtifact {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedArtifact {
    /// Temporary location of the staged content.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Final location once committed.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically move the staged file to its final name.
    pub fn commit(self) -> Result<PathBuf, StorageError> {
        let Self { file, target } = self;
        file.persist(&target)
            .map_err(|err| StorageError::io(&target, err.error))?;
        Ok(target)
    }
}
