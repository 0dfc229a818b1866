//! Character-encoding detection and classification.
//!
//! Detection yields a charset *label*; classification decides whether the
//! label belongs to a family we can read. Only the UTF family (read as-is)
//! and the GB family (transcoded with the GB18030 decoder, a superset of
//! GB2312 and GBK) are accepted.

use crate::model::EncodingError;
use encoding_rs::{Encoding, GB18030, UTF_8};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Default number of leading bytes handed to the detector.
pub const DEFAULT_SAMPLE_BYTES: usize = 4096;

/// Encoding family of an accepted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 or UTF-16; decoded without transcoding.
    Utf(&'static Encoding),
    /// GB2312 / GBK / GB18030; transcoded to UTF-8.
    Gb,
}

impl TextEncoding {
    /// The decoder used for this family.
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            TextEncoding::Utf(encoding) => encoding,
            TextEncoding::Gb => GB18030,
        }
    }

    /// Whether bytes must be transcoded to become UTF-8.
    pub fn needs_transcoding(&self) -> bool {
        self.encoding() != UTF_8
    }

    /// Decode `bytes` into UTF-8 text.
    ///
    /// A byte-order mark overrides the family and is stripped. Malformed
    /// sequences become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let (text, used, malformed) = self.encoding().decode(bytes);
        if malformed {
            warn!(encoding = used.name(), "Replaced malformed byte sequences while decoding");
        }
        text
    }
}

/// Source of charset guesses.
///
/// `complete` is true when `sample` holds the entire file.
pub trait CharsetDetector {
    /// Charset label for `sample`, or `None` when no guess is possible.
    fn detect(&self, sample: &[u8], complete: bool) -> Option<String>;
}

/// Default detector: byte-order mark, then UTF-8 validity, then
/// statistical guessing via `chardetng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector;

impl CharsetDetector for StatisticalDetector {
    fn detect(&self, sample: &[u8], complete: bool) -> Option<String> {
        if let Some((encoding, _)) = Encoding::for_bom(sample) {
            return Some(encoding.name().to_string());
        }
        if is_utf8_prefix(sample, complete) {
            return Some(UTF_8.name().to_string());
        }
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(sample, complete);
        Some(detector.guess(None, true).name().to_string())
    }
}

/// Valid UTF-8, allowing a multi-byte sequence cut off by the end of an
/// incomplete sample.
fn is_utf8_prefix(sample: &[u8], complete: bool) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(err) => !complete && err.error_len().is_none(),
    }
}

/// Map a charset label to an accepted encoding family.
///
/// ```
/// use txtreader::import::encoding::{classify, TextEncoding};
///
/// assert_eq!(classify("GB2312").unwrap(), TextEncoding::Gb);
/// assert!(!classify("UTF-8").unwrap().needs_transcoding());
/// assert!(classify("Shift_JIS").is_err());
/// ```
///
/// # Errors
///
/// Returns [`EncodingError::Unsupported`] for labels outside both families,
/// including UTF variants `encoding_rs` cannot decode (UTF-32).
pub fn classify(label: &str) -> Result<TextEncoding, EncodingError> {
    let lower = label.trim().to_ascii_lowercase();
    let unsupported = || EncodingError::Unsupported {
        charset: label.to_string(),
    };

    if lower.starts_with("gb") {
        Ok(TextEncoding::Gb)
    } else if lower.starts_with("utf") {
        Encoding::for_label(lower.as_bytes())
            .map(TextEncoding::Utf)
            .ok_or_else(unsupported)
    } else {
        Err(unsupported())
    }
}

/// Detect and classify the encoding of `sample`.
///
/// # Errors
///
/// [`EncodingError::Undetermined`] when the detector has no answer,
/// otherwise whatever [`classify`] reports.
pub fn detect_encoding(
    detector: &dyn CharsetDetector,
    sample: &[u8],
    complete: bool,
) -> Result<TextEncoding, EncodingError> {
    let label = detector
        .detect(sample, complete)
        .ok_or(EncodingError::Undetermined)?;
    debug!(charset = %label, sample_len = sample.len(), "Detected charset");
    classify(&label)
}
