//! Label module - the immutable input unit and its normalized text

use std::fmt;
use std::ops::Deref;

/// One OCR text block produced by scanning a single shipping label
///
/// Created by the input loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLabel {
    /// Identifier carried through to every output row
    pub sample_id: String,

    /// Noisy OCR text as recognized from the label image
    pub raw_text: String,
}

impl RawLabel {
    /// Create a new raw label
    pub fn new(sample_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Canonical text derived from [`RawLabel::raw_text`]
///
/// Only the text normalizer constructs these, so holding a `CleanedText` means
/// control characters are gone and whitespace is collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedText(String);

impl CleanedText {
    /// Wrap an already-normalized string
    pub fn from_normalized(text: String) -> Self {
        Self(text)
    }

    /// Borrow the text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for CleanedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CleanedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CleanedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
