//! Document path handling.

use std::path::{Component, Path, PathBuf};

use crate::error::ProcessError;

/// Extensions accepted for documents given on the command line.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["typ"];

/// Extensions offered when browsing (`.mtyp` marks Mermaid-enabled Typst).
pub const BROWSE_EXTENSIONS: &[&str] = &["typ", "mtyp"];

/// Resolve user input to an absolute, lexically normalized path.
///
/// Expands a leading `~` and joins relative paths onto `cwd`.
#[must_use]
pub fn resolve_path(input: &str, cwd: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(input);
    let path = Path::new(expanded.as_ref());
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize(&joined)
}

/// Remove `.` and resolve `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    result.pop();
                }
            }
            other => result.push(other),
        }
    }
    result
}

/// Whether `path` has one of the given extensions.
#[must_use]
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// Check that `path` is an existing file with an accepted extension.
pub fn validate_document_path(path: &Path, extensions: &[&str]) -> Result<(), ProcessError> {
    if !path.exists() {
        return Err(ProcessError::InvalidPath(format!(
            "File not found: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(ProcessError::InvalidPath(format!(
            "Not a file: {}",
            path.display()
        )));
    }
    if !has_extension(path, extensions) {
        return Err(ProcessError::InvalidPath(format!(
            "Not a Typst file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Sibling path for the processed document: `<stem>.<suffix>.<ext>`.
#[must_use]
pub fn output_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}.{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{suffix}"),
    };
    path.with_file_name(file_name)
}
