//! Mermaid diagram rendering for Typst documents.
//!
//! This crate turns fenced Mermaid blocks in a Typst document into image
//! figures:
//! - Blocks are found with [`extract_diagrams`], duplicates included
//! - Leading `%%` lines carry [`Directives`] (`%%!` caption, `%%` image arguments)
//! - Images are content-addressed by [`Fingerprint`] and cached on disk by [`RenderCache`]
//! - Cache misses are rendered through a [`DiagramRenderer`] such as [`MermaidCli`]
//! - [`substitute()`] replaces each block with a `#figure(image(..))` reference
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `fingerprint`: Significant-text hashing
//! - `directives`: Caption and argument parsing
//! - `extract`: Fenced block extraction with byte spans
//! - `render`: Renderer trait and Mermaid CLI subprocess
//! - `cache`: Fingerprint-named image cache
//! - `substitute`: Span-based replacement with reference constructs
//! - `processor`: [`DiagramProcessor`] tying the steps together
//!
//! # Example
//!
//! ```ignore
//! use mtyp_diagrams::{DiagramProcessor, MermaidCli};
//!
//! let processor = DiagramProcessor::new(MermaidCli::new("mmdc"));
//! let report = processor.process(Path::new("report.typ"))?;
//! // report.typ -> report.modified.typ, images beside it
//! ```

mod cache;
mod consts;
mod directives;
mod document;
mod error;
mod extract;
mod fingerprint;
mod format;
mod processor;
mod render;
mod substitute;

pub use cache::{CacheStatus, CachedImage, RenderCache};
pub use consts::{DEFAULT_BACKGROUND, DEFAULT_OUTPUT_SUFFIX, DEFAULT_RENDERER};
pub use directives::Directives;
pub use document::{
    BROWSE_EXTENSIONS, DOCUMENT_EXTENSIONS, has_extension, output_path, resolve_path,
    validate_document_path,
};
pub use error::ProcessError;
pub use extract::{DiagramBlock, extract_diagrams};
pub use fingerprint::{Fingerprint, significant_text};
pub use format::ImageFormat;
pub use processor::{DiagramProcessor, ProcessReport, TransformedDocument};
pub use render::{DiagramRenderer, MermaidCli, RenderError};
pub use substitute::{reference_construct, substitute};
