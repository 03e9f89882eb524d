//! Internal constants for diagram processing.

/// Language tag on the opening fence of a diagram block.
pub const FENCE_LANGUAGE: &str = "mermaid";

/// Marker starting a render-argument directive line (`%%width: 50%`).
pub const DIRECTIVE_MARKER: &str = "%%";

/// Marker starting a caption directive line (`%%! My Caption`).
pub const CAPTION_MARKER: &str = "%%!";

/// Default renderer executable (Mermaid CLI).
#[cfg(not(windows))]
pub const DEFAULT_RENDERER: &str = "mmdc";

/// Default renderer executable (Mermaid CLI).
///
/// npm installs a `.cmd` shim on Windows, which `Command` does not resolve
/// from a bare `mmdc`.
#[cfg(windows)]
pub const DEFAULT_RENDERER: &str = "mmdc.cmd";

/// Default background passed to the renderer.
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Default suffix inserted into the output document name.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "modified";

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_default_renderer_unix() {
        assert_eq!(DEFAULT_RENDERER, "mmdc");
    }

    #[cfg(windows)]
    #[test]
    fn test_default_renderer_windows_uses_cmd_shim() {
        assert_eq!(DEFAULT_RENDERER, "mmdc.cmd");
    }
}
