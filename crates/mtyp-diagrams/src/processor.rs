//! End-to-end processing of a Typst document.
//!
//! This module provides [`DiagramProcessor`], which runs the whole pipeline for
//! one document: probe the renderer, extract diagram blocks, render every block
//! that is not already cached, substitute figure references and write the
//! result beside the input.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cache::{CacheStatus, RenderCache};
use crate::consts::DEFAULT_OUTPUT_SUFFIX;
use crate::document::output_path;
use crate::error::ProcessError;
use crate::extract::extract_diagrams;
use crate::format::ImageFormat;
use crate::render::DiagramRenderer;
use crate::substitute::substitute;

/// Summary of a processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// Path the processed document was written to.
    pub output_path: PathBuf,
    /// Number of diagram blocks found, duplicates included.
    pub diagrams: usize,
    /// Number of distinct fingerprints among them.
    pub unique: usize,
    /// Renderer invocations performed.
    pub rendered: usize,
    /// Blocks served from existing images.
    pub cache_hits: usize,
}

/// Document text with diagrams replaced, plus render statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedDocument {
    pub text: String,
    pub diagrams: usize,
    pub unique: usize,
    pub rendered: usize,
    pub cache_hits: usize,
}

/// Runs the extract, render and substitute pipeline for Typst documents.
///
/// # Configuration
///
/// Create the processor with a renderer, then configure using builder methods:
/// - [`format`](Self::format): Image format for rendered diagrams (default: png)
/// - [`output_suffix`](Self::output_suffix): Suffix for the output document name
///
/// # Example
///
/// ```ignore
/// use mtyp_diagrams::{DiagramProcessor, ImageFormat, MermaidCli};
///
/// let processor = DiagramProcessor::new(MermaidCli::new("mmdc"))
///     .format(ImageFormat::Svg);
///
/// let report = processor.process(Path::new("/docs/report.typ"))?;
/// println!("wrote {}", report.output_path.display());
/// ```
pub struct DiagramProcessor<R> {
    renderer: R,
    format: ImageFormat,
    output_suffix: String,
}

impl<R: DiagramRenderer> DiagramProcessor<R> {
    /// Create a processor that renders through `renderer`.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            format: ImageFormat::default(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_owned(),
        }
    }

    /// Set the image format for rendered diagrams.
    #[must_use]
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the suffix inserted into the output file name
    /// (`report.typ` becomes `report.<suffix>.typ`).
    #[must_use]
    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// The configured renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Probe the renderer, returning its version.
    pub fn check_renderer(&self) -> Result<String, ProcessError> {
        let version = self
            .renderer
            .version()
            .map_err(ProcessError::ToolUnavailable)?;
        tracing::info!(version = %version, "Mermaid CLI available");
        Ok(version)
    }

    /// Process the document at `path`.
    ///
    /// Images are written beside the document and the processed text goes to
    /// a sibling file. Nothing is written for the document if any step fails.
    pub fn process(&self, path: &Path) -> Result<ProcessReport, ProcessError> {
        self.check_renderer()?;

        let document = std::fs::read_to_string(path).map_err(|source| ProcessError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let working_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let transformed = self
            .transform(&document, working_dir)?
            .ok_or_else(|| ProcessError::NoDiagramsFound(path.to_path_buf()))?;

        let output_path = output_path(path, &self.output_suffix);
        std::fs::write(&output_path, &transformed.text).map_err(|source| {
            ProcessError::FileWrite {
                path: output_path.clone(),
                source,
            }
        })?;

        tracing::info!(
            output = %output_path.display(),
            diagrams = transformed.diagrams,
            rendered = transformed.rendered,
            "Document processed"
        );

        Ok(ProcessReport {
            output_path,
            diagrams: transformed.diagrams,
            unique: transformed.unique,
            rendered: transformed.rendered,
            cache_hits: transformed.cache_hits,
        })
    }

    /// Render and substitute all diagrams in `document`.
    ///
    /// Images are resolved against `working_dir`. Returns `Ok(None)` when the
    /// document has no diagram blocks. Rendering stops at the first failure.
    pub fn transform(
        &self,
        document: &str,
        working_dir: &Path,
    ) -> Result<Option<TransformedDocument>, ProcessError> {
        let blocks = extract_diagrams(document);
        tracing::debug!(count = blocks.len(), "Extracted diagram blocks");
        if blocks.is_empty() {
            return Ok(None);
        }

        let cache = RenderCache::new(working_dir, self.format);
        let mut rendered = 0;
        let mut cache_hits = 0;

        for (index, block) in blocks.iter().enumerate() {
            let image = cache
                .ensure_rendered(&self.renderer, &block.raw)
                .map_err(|source| ProcessError::Render { index, source })?;
            match image.status {
                CacheStatus::Rendered => rendered += 1,
                CacheStatus::Hit => cache_hits += 1,
            }
        }

        let unique = blocks
            .iter()
            .map(|block| &block.fingerprint)
            .collect::<HashSet<_>>()
            .len();

        Ok(Some(TransformedDocument {
            text: substitute(document, &blocks, self.format),
            diagrams: blocks.len(),
            unique,
            rendered,
            cache_hits,
        }))
    }
}
