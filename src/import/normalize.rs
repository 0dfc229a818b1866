//! Raw file → normalized line sequence.

use super::encoding::{detect_encoding, CharsetDetector, StatisticalDetector, TextEncoding};
use super::ImportError;
use crate::model::InputError;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Decoded, blank-line-free content of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Encoding family the file was read with.
    pub encoding: TextEncoding,
    /// Non-empty lines in file order.
    pub lines: Vec<String>,
}

/// Reads candidate files, detects their encoding and normalizes lines.
pub struct Normalizer {
    detector: Box<dyn CharsetDetector + Send + Sync>,
    sample_bytes: usize,
}

impl Normalizer {
    /// Normalizer with a custom detector.
    pub fn new(detector: Box<dyn CharsetDetector + Send + Sync>, sample_bytes: usize) -> Self {
        Self {
            detector,
            sample_bytes: sample_bytes.max(1),
        }
    }

    /// Statistical detection with the given sample size.
    pub fn with_sample_bytes(sample_bytes: usize) -> Self {
        Self::new(Box::new(StatisticalDetector), sample_bytes)
    }

    /// Bytes sampled for detection.
    pub fn sample_bytes(&self) -> usize {
        self.sample_bytes
    }

    /// Read, detect and normalize the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`InputError::FileNotFound`] / [`InputError::Io`] if the file cannot be read
    /// - [`crate::model::EncodingError`] if the charset is undeterminable or unsupported
    pub fn normalize_file(&self, path: &Path) -> Result<NormalizedText, ImportError> {
        let mut file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => InputError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => InputError::Io(err),
        })?;

        let mut sample = Vec::with_capacity(self.sample_bytes);
        (&mut file)
            .take(self.sample_bytes as u64)
            .read_to_end(&mut sample)
            .map_err(InputError::from)?;
        let complete = sample.len() < self.sample_bytes;
        let encoding = detect_encoding(self.detector.as_ref(), &sample, complete)?;

        file.rewind().map_err(InputError::from)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(InputError::from)?;

        let lines = normalize_lines(&encoding.decode(&bytes));
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            lines = lines.len(),
            transcoded = encoding.needs_transcoding(),
            "Normalized file"
        );
        Ok(NormalizedText { encoding, lines })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_sample_bytes(super::encoding::DEFAULT_SAMPLE_BYTES)
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("sample_bytes", &self.sample_bytes)
            .finish_non_exhaustive()
    }
}

/// Split decoded text into lines, dropping empty ones.
///
/// Both `\n` and `\r\n` terminate a line.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
