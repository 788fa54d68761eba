//! Content Type Detection
//!
//! Stamp payloads travel as base64 text, so content types are recognised by
//! the base64 rendering of each format's magic bytes rather than the raw
//! bytes themselves. Detection order matters: the first matching prefix
//! wins, then JSON, then HTML as the catch-all.
//!
//! ## Usage
//!
//! ```rust
//! use stamp_decoder::types::content_detection::StampMime;
//!
//! assert_eq!(StampMime::sniff_base64_prefix("iVBORw0KGgo="), Some(StampMime::Png));
//! assert_eq!(StampMime::Png.mime_type(), "image/png");
//! assert_eq!(StampMime::Png.extension(), "png");
//! ```

use serde::{Deserialize, Serialize};

/// base64 of `GIF8`
pub const GIF_PREFIX: &str = "R0lGOD";
/// base64 of the PNG signature `89 50 4E 47`
pub const PNG_PREFIX: &str = "iVBORw";
/// base64 of the JPEG SOI marker `FF D8 FF`
pub const JPEG_PREFIX: &str = "/9j/";
/// base64 of `<svg`
pub const SVG_PREFIX: &str = "PHN2Z";
/// base64 of `<?xml`
pub const XML_DECLARATION_PREFIX: &str = "PD94b";
/// base64 of `RIFF`
pub const WEBP_PREFIX: &str = "UklGR";
/// base64 of the gzip magic `1F 8B 08`
pub const GZIP_PREFIX: &str = "H4sI";

/// Base64 prefixes checked in priority order
const PREFIX_TABLE: &[(&str, StampMime)] = &[
    (GIF_PREFIX, StampMime::Gif),
    (PNG_PREFIX, StampMime::Png),
    (JPEG_PREFIX, StampMime::Jpeg),
    (SVG_PREFIX, StampMime::Svg),
    (XML_DECLARATION_PREFIX, StampMime::Svg),
    (WEBP_PREFIX, StampMime::Webp),
    (GZIP_PREFIX, StampMime::Gzip),
];

/// Content types a stamp can resolve to
///
/// Serialised as the MIME string (`"image/png"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StampMime {
    Gif,
    Png,
    Jpeg,
    /// SVG image, also assumed for any XML-declared document
    Svg,
    Webp,
    /// Gzip container that was not unwrapped
    Gzip,
    Json,
    /// Default when nothing more specific matches
    Html,
    /// HTML carrying a `<video src=...>` element
    Mp4,
}

impl StampMime {
    /// Match the fixed base64 prefixes only (no JSON/HTML fallback)
    pub fn sniff_base64_prefix(data: &str) -> Option<Self> {
        PREFIX_TABLE
            .iter()
            .find(|(prefix, _)| data.starts_with(prefix))
            .map(|(_, mime)| *mime)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            StampMime::Gif => "image/gif",
            StampMime::Png => "image/png",
            StampMime::Jpeg => "image/jpeg",
            StampMime::Svg => "image/svg+xml",
            StampMime::Webp => "image/webp",
            StampMime::Gzip => "application/gzip",
            StampMime::Json => "application/json",
            StampMime::Html => "text/html",
            StampMime::Mp4 => "video/mp4",
        }
    }

    /// File extension used when persisting the artifact
    pub fn extension(&self) -> &'static str {
        match self {
            StampMime::Gif => "gif",
            StampMime::Png => "png",
            StampMime::Jpeg => "jpg",
            StampMime::Svg => "svg",
            StampMime::Webp => "webp",
            StampMime::Gzip => "gz",
            StampMime::Json => "json",
            StampMime::Html => "html",
            StampMime::Mp4 => "mp4",
        }
    }

    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type.to_ascii_lowercase().as_str() {
            "image/gif" => Some(StampMime::Gif),
            "image/png" => Some(StampMime::Png),
            "image/jpeg" | "image/jpg" => Some(StampMime::Jpeg),
            "image/svg+xml" => Some(StampMime::Svg),
            "image/webp" => Some(StampMime::Webp),
            "application/gzip" => Some(StampMime::Gzip),
            "application/json" => Some(StampMime::Json),
            "text/html" => Some(StampMime::Html),
            "video/mp4" => Some(StampMime::Mp4),
            _ => None,
        }
    }

    /// Whether the MIME string names HTML content
    pub fn is_html_type(mime_type: &str) -> bool {
        mime_type.to_ascii_lowercase().contains("html")
    }
}

impl From<StampMime> for String {
    fn from(mime: StampMime) -> Self {
        mime.mime_type().to_string()
    }
}

impl TryFrom<String> for StampMime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StampMime::from_mime_type(&value).ok_or_else(|| format!("unsupported MIME type: {}", value))
    }
}

impl std::fmt::Display for StampMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}
