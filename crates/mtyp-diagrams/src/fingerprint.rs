//! Content fingerprints for diagram sources.
//!
//! Provides [`Fingerprint`] for computing content-based hashes used both as
//! render cache keys and as image file names.

use std::fmt;

use sha1::{Digest, Sha1};

use crate::consts::DIRECTIVE_MARKER;
use crate::format::ImageFormat;

/// SHA-1 digest of a diagram's significant text, as lowercase hex.
///
/// Directive lines and blank lines do not contribute, so two diagrams that
/// differ only in caption or arguments share a fingerprint and one image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a diagram's raw text.
    ///
    /// # Hash Format
    ///
    /// SHA-1 of [`significant_text`], rendered as 40 lowercase hex characters.
    #[must_use]
    pub fn compute(raw: &str) -> Self {
        let significant = significant_text(raw);
        let mut hasher = Sha1::new();
        hasher.update(significant.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Image file name for this fingerprint (`<fingerprint>.<ext>`).
    #[must_use]
    pub fn file_name(&self, format: ImageFormat) -> String {
        format!("{}.{}", self.0, format.extension())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip directive lines and blank lines, rejoining the rest with `\n`.
///
/// Directive lines are dropped wherever they appear, not only in the leading
/// run parsed by [`Directives::parse`](crate::Directives::parse).
#[must_use]
pub fn significant_text(raw: &str) -> String {
    raw.split('\n')
        .filter(|line| !line.starts_with(DIRECTIVE_MARKER))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
