//! Errors that end processing of a document.

use std::path::PathBuf;

use crate::render::RenderError;

/// Error from [`DiagramProcessor::process`](crate::DiagramProcessor::process).
///
/// Every variant is terminal for the current document; nothing is retried and
/// no output document is written.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The renderer failed its availability probe.
    #[error("Mermaid CLI not available ({0}). Please install @mermaid-js/mermaid-cli")]
    ToolUnavailable(#[source] RenderError),

    /// The input document could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document has no diagram blocks.
    #[error("No Mermaid diagrams found in {}", .0.display())]
    NoDiagramsFound(PathBuf),

    /// A diagram failed to render.
    #[error("Error rendering diagram {index}: {source}")]
    Render {
        /// Zero-based position of the block in the document.
        index: usize,
        #[source]
        source: RenderError,
    },

    /// The output document could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document path is missing, not a file, or has the wrong extension.
    #[error("{0}")]
    InvalidPath(String),
}
