//! Replacement of diagram blocks with Typst figure references.
//!
//! Each block is replaced by its byte span rather than by searching for its
//! text, so identical blocks are each replaced exactly once and the generated
//! markup can never be matched again.

use std::ops::Range;

use crate::extract::DiagramBlock;
use crate::format::ImageFormat;

/// Build the Typst reference construct for a diagram block.
///
/// ```text
/// #figure(image("./<fingerprint>.png", <args>), caption: "<caption>")
/// ```
///
/// Arguments are inserted verbatim; the caption is emitted as a string literal.
#[must_use]
pub fn reference_construct(block: &DiagramBlock, format: ImageFormat) -> String {
    let directives = block.directives();
    let image_path = format!("./{}", block.fingerprint.file_name(format));

    let image = if directives.args.is_empty() {
        format!("image(\"{image_path}\")")
    } else {
        format!("image(\"{image_path}\", {})", directives.args)
    };

    format!(
        "#figure({image}, caption: \"{}\")",
        escape_typst_string(&directives.caption)
    )
}

/// Escape text for use inside a Typst string literal.
fn escape_typst_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replace every block in `document` with its reference construct.
///
/// `blocks` must come from [`extract_diagrams`](crate::extract_diagrams) on
/// the same document text.
#[must_use]
pub fn substitute(document: &str, blocks: &[DiagramBlock], format: ImageFormat) -> String {
    let mut replacements = Replacements::with_capacity(blocks.len());
    for block in blocks {
        replacements.add(block.span.clone(), reference_construct(block, format));
    }
    replacements.apply(document)
}

/// Collects span replacements for single-pass application.
struct Replacements {
    spans: Vec<(Range<usize>, String)>,
}

impl Replacements {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    /// Add a replacement for a byte span of the source text.
    fn add(&mut self, span: Range<usize>, content: String) {
        self.spans.push((span, content));
    }

    /// Apply all replacements in a single pass over `text`.
    ///
    /// Spans that overlap an earlier span or fall outside `text` are skipped.
    fn apply(mut self, text: &str) -> String {
        self.spans.sort_by_key(|(span, _)| span.start);

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;

        for (span, content) in &self.spans {
            if span.start < cursor || text.get(span.clone()).is_none() {
                tracing::warn!(?span, "Skipping invalid diagram span");
                continue;
            }
            result.push_str(&text[cursor..span.start]);
            result.push_str(content);
            cursor = span.end;
        }

        result.push_str(&text[cursor..]);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_diagrams;
    use crate::fingerprint::Fingerprint;
    use pretty_assertions::assert_eq;

    fn block(raw: &str) -> DiagramBlock {
        let doc = format!("```mermaid\n{raw}\n```");
        extract_diagrams(&doc).remove(0)
    }

    #[test]
    fn test_reference_with_caption_and_args() {
        let block = block("%%! My Caption\n%%width: 50%\ngraph TD");
        let fp = Fingerprint::compute("graph TD");

        assert_eq!(
            reference_construct(&block, ImageFormat::Png),
            format!("#figure(image(\"./{fp}.png\", width: 50%), caption: \"My Caption\")")
        );
    }

    #[test]
    fn test_reference_without_directives() {
        let block = block("graph TD");
        let fp = Fingerprint::compute("graph TD");

        assert_eq!(
            reference_construct(&block, ImageFormat::Png),
            format!("#figure(image(\"./{fp}.png\"), caption: \"\")")
        );
    }

    #[test]
    fn test_reference_uses_format_extension() {
        let block = block("graph TD");

        assert!(reference_construct(&block, ImageFormat::Svg).contains(".svg\")"));
    }

    #[test]
    fn test_reference_escapes_caption() {
        let block = block("%%! Say \"hi\" \\ bye\ngraph TD");

        let reference = reference_construct(&block, ImageFormat::Png);

        assert!(reference.ends_with(r#"caption: "Say \"hi\" \\ bye")"#), "{reference}");
    }

    #[test]
    fn test_substitute_single() {
        let doc = "Before\n```mermaid\ngraph TD\n```\nAfter";
        let blocks = extract_diagrams(doc);
        let fp = Fingerprint::compute("graph TD");

        let result = substitute(doc, &blocks, ImageFormat::Png);

        assert_eq!(
            result,
            format!("Before\n#figure(image(\"./{fp}.png\"), caption: \"\")\nAfter")
        );
    }

    #[test]
    fn test_substitute_identical_blocks() {
        let doc = "```mermaid\ngraph TD\n```\n\n```mermaid\ngraph TD\n```\n";
        let blocks = extract_diagrams(doc);

        let result = substitute(doc, &blocks, ImageFormat::Png);

        let reference = reference_construct(&blocks[0], ImageFormat::Png);
        assert_eq!(result, format!("{reference}\n\n{reference}\n"));
        assert!(!result.contains("```mermaid"));
    }

    #[test]
    fn test_substitute_same_diagram_different_captions() {
        let doc = "```mermaid\n%%! One\ngraph TD\n```\n```mermaid\n%%! Two\ngraph TD\n```";
        let blocks = extract_diagrams(doc);
        let fp = Fingerprint::compute("graph TD");

        let result = substitute(doc, &blocks, ImageFormat::Png);

        assert_eq!(
            result,
            format!(
                "#figure(image(\"./{fp}.png\"), caption: \"One\")\n#figure(image(\"./{fp}.png\"), caption: \"Two\")"
            )
        );
    }

    #[test]
    fn test_substitute_leaves_other_fences() {
        let doc = "```rust\nfn main() {}\n```\n```mermaid\ngraph TD\n```";
        let blocks = extract_diagrams(doc);

        let result = substitute(doc, &blocks, ImageFormat::Png);

        assert!(result.starts_with("```rust\nfn main() {}\n```\n#figure("));
    }

    #[test]
    fn test_substitute_no_blocks() {
        let doc = "= Nothing here";

        assert_eq!(substitute(doc, &[], ImageFormat::Png), doc);
    }

    #[test]
    fn test_replacements_out_of_order() {
        let mut replacements = Replacements::with_capacity(3);
        replacements.add(4..5, "C".to_owned());
        replacements.add(0..1, "A".to_owned());
        replacements.add(2..3, "B".to_owned());

        assert_eq!(replacements.apply("a-b-c"), "A-B-C");
    }

    #[test]
    fn test_replacements_skip_overlap() {
        let mut replacements = Replacements::with_capacity(2);
        replacements.add(0..3, "X".to_owned());
        replacements.add(2..4, "Y".to_owned());

        assert_eq!(replacements.apply("abcdef"), "Xdef");
    }

    #[test]
    fn test_replacements_skip_out_of_bounds() {
        let mut replacements = Replacements::with_capacity(1);
        replacements.add(2..10, "X".to_owned());

        assert_eq!(replacements.apply("abc"), "abc");
    }
}
