//! Image formats supported by the Mermaid CLI.

/// Output format for rendered diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Raster image (default).
    #[default]
    Png,
    /// Vector image.
    Svg,
    /// PDF document.
    Pdf,
}

impl ImageFormat {
    /// Parse format from a configuration value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// File extension, also used as the string representation.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_default() {
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!(ImageFormat::parse("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::parse("svg"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::parse("pdf"), Some(ImageFormat::Pdf));
        assert_eq!(ImageFormat::parse("PNG"), None);
        assert_eq!(ImageFormat::parse("jpeg"), None);
        assert_eq!(ImageFormat::parse(""), None);
    }

    #[test]
    fn test_image_format_extension_roundtrip() {
        for format in [ImageFormat::Png, ImageFormat::Svg, ImageFormat::Pdf] {
            assert_eq!(ImageFormat::parse(format.extension()), Some(format));
        }
    }
}
