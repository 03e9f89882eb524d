//! Leading directive lines of a diagram block.
//!
//! A diagram may open with comment lines that carry rendering metadata:
//!
//! ```text
//! %%! Request flow          <- caption
//! %%width: 50%              <- arguments passed to Typst's image()
//! sequenceDiagram
//!   A->>B: hello
//! ```
//!
//! Only the leading run is inspected. The first line that is not a directive,
//! blank lines included, ends the scan.

use crate::consts::{CAPTION_MARKER, DIRECTIVE_MARKER};

/// Metadata parsed from a diagram's leading directive lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Raw parameter fragment for the image call (e.g. `width: 50%`).
    pub args: String,
    /// Figure caption.
    pub caption: String,
}

impl Directives {
    /// Parse directives from a diagram's raw text.
    ///
    /// When a kind repeats within the leading run, the last one wins.
    /// Missing kinds default to empty strings.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut directives = Self::default();

        for line in raw.split('\n') {
            if let Some(caption) = line.strip_prefix(CAPTION_MARKER) {
                caption.trim().clone_into(&mut directives.caption);
            } else if let Some(args) = line.strip_prefix(DIRECTIVE_MARKER) {
                args.trim().clone_into(&mut directives.args);
            } else {
                break;
            }
        }

        directives
    }
}
