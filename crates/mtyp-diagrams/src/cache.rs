//! Render cache keyed by fingerprint.
//!
//! The cache is the output directory itself: an image named
//! `<fingerprint>.<ext>` that already exists is reused as-is. Files are never
//! removed, and a hit does not check that the image still matches the current
//! renderer settings.

use std::path::{Path, PathBuf};

use crate::fingerprint::Fingerprint;
use crate::format::ImageFormat;
use crate::render::{DiagramRenderer, RenderError};

/// How an image was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The image already existed.
    Hit,
    /// The renderer was invoked.
    Rendered,
}

/// Image available for a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    /// Location on disk.
    pub path: PathBuf,
    /// Fingerprint the image is named after.
    pub fingerprint: Fingerprint,
    pub status: CacheStatus,
}

/// Content-addressed image store rooted at a document's directory.
#[derive(Debug, Clone)]
pub struct RenderCache {
    dir: PathBuf,
    format: ImageFormat,
}

impl RenderCache {
    /// Create a cache writing images of `format` into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Directory images are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Image format of cached files.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Path of the image for a fingerprint, whether or not it exists yet.
    #[must_use]
    pub fn image_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(fingerprint.file_name(self.format))
    }

    /// Make sure an image exists for `raw`, rendering it on a miss.
    ///
    /// The renderer receives the full raw text, directives included. Failures
    /// are returned as-is and never retried.
    pub fn ensure_rendered<R>(&self, renderer: &R, raw: &str) -> Result<CachedImage, RenderError>
    where
        R: DiagramRenderer + ?Sized,
    {
        let fingerprint = Fingerprint::compute(raw);
        let path = self.image_path(&fingerprint);

        if path.exists() {
            tracing::debug!(fingerprint = %fingerprint, "Diagram cache hit");
            return Ok(CachedImage {
                path,
                fingerprint,
                status: CacheStatus::Hit,
            });
        }

        tracing::info!(fingerprint = %fingerprint, path = %path.display(), "Rendering diagram");
        renderer.render(raw, &path)?;

        Ok(CachedImage {
            path,
            fingerprint,
            status: CacheStatus::Rendered,
        })
    }
}
