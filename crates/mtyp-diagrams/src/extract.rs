//! Fenced diagram block extraction.
//!
//! Finds `` ```mermaid `` blocks in document text and records where each one
//! sits so substitution can work on exact byte spans.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::directives::Directives;
use crate::fingerprint::Fingerprint;

static FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\n(.*?)\n```").unwrap());

/// A diagram block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Text between the fences, directive lines included.
    pub raw: String,
    /// Byte span of the whole block in the document, fences included.
    pub span: Range<usize>,
    /// Fingerprint of the significant text.
    pub fingerprint: Fingerprint,
}

impl DiagramBlock {
    fn new(raw: &str, span: Range<usize>) -> Self {
        Self {
            raw: raw.to_owned(),
            span,
            fingerprint: Fingerprint::compute(raw),
        }
    }

    /// Caption and arguments from the block's leading directives.
    #[must_use]
    pub fn directives(&self) -> Directives {
        Directives::parse(&self.raw)
    }
}

/// Extract diagram blocks in document order.
///
/// Identical blocks are returned as separate entries.
#[must_use]
pub fn extract_diagrams(document: &str) -> Vec<DiagramBlock> {
    FENCE_PATTERN
        .captures_iter(document)
        .filter_map(|caps| {
            let block = caps.get(0)?;
            let raw = caps.get(1)?;
            Some(DiagramBlock::new(raw.as_str(), block.range()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_single() {
        let doc = "= Title\n\n```mermaid\ngraph TD\n  A --> B\n```\n\nText.";

        let blocks = extract_diagrams(doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw, "graph TD\n  A --> B");
        assert_eq!(&doc[blocks[0].span.clone()], "```mermaid\ngraph TD\n  A --> B\n```");
    }

    #[test]
    fn test_extract_none() {
        let doc = "= Title\n\n```rust\nfn main() {}\n```\n";

        assert!(extract_diagrams(doc).is_empty());
    }

    #[test]
    fn test_extract_preserves_order() {
        let doc = "```mermaid\nfirst\n```\ntext\n```mermaid\nsecond\n```\n```mermaid\nthird\n```";

        let raws: Vec<_> = extract_diagrams(doc).into_iter().map(|b| b.raw).collect();

        assert_eq!(raws, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let doc = "```mermaid\ngraph TD\n```\n\n```mermaid\ngraph TD\n```\n";

        let blocks = extract_diagrams(doc);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw, blocks[1].raw);
        assert_eq!(blocks[0].fingerprint, blocks[1].fingerprint);
        assert!(blocks[0].span.end <= blocks[1].span.start);
    }

    #[test]
    fn test_extract_is_non_greedy() {
        let doc = "```mermaid\na\n```\nmiddle\n```mermaid\nb\n```";

        let blocks = extract_diagrams(doc);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw, "a");
        assert_eq!(blocks[1].raw, "b");
    }

    #[test]
    fn test_extract_keeps_directives_in_raw() {
        let doc = "```mermaid\n%%! Caption\n%%width: 50%\ngraph TD\n```";

        let blocks = extract_diagrams(doc);

        assert_eq!(blocks[0].raw, "%%! Caption\n%%width: 50%\ngraph TD");
        assert_eq!(blocks[0].directives().caption, "Caption");
        assert_eq!(blocks[0].directives().args, "width: 50%");
    }

    #[test]
    fn test_extract_requires_newline_after_tag() {
        let doc = "```mermaid graph TD\n```";

        assert!(extract_diagrams(doc).is_empty());
    }

    #[test]
    fn test_extract_unterminated_block() {
        let doc = "```mermaid\ngraph TD\n  A --> B\n";

        assert!(extract_diagrams(doc).is_empty());
    }

    #[test]
    fn test_extract_multibyte_spans() {
        let doc = "= Überblick\n```mermaid\ngraph TD\n  Ä --> Ö\n```\nEnde";

        let blocks = extract_diagrams(doc);

        assert_eq!(blocks.len(), 1);
        assert_eq!(
            &doc[blocks[0].span.clone()],
            "```mermaid\ngraph TD\n  Ä --> Ö\n```"
        );
    }
}
