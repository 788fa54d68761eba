//! Stamp content decoding
//!
//! Turns the base64 text after `stamp:` into a [`StampContent`]: whitespace
//! stripped, re-padded, gunzipped when it is a gzip stream, validated, then
//! typed by prefix sniffing. HTML is scanned once more for a `<video src>`
//! and re-tagged as video when one is found.

use super::error::{DecoderError, DecoderResult};
use crate::types::content_detection::{StampMime, GZIP_PREFIX};
use crate::types::stamps::{Compression, StampContent, StampEncoding};
use crate::utils::currency::format_btc;
use crate::utils::uri::encode_uri;
use base64::{
    alphabet,
    engine::{self, general_purpose::STANDARD, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::io::Read;
use tracing::debug;

/// Decoder tolerant of non-canonical trailing bits, as on-chain encoders vary
pub const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(engine::DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub const VIDEO_NOTE: &str = "Video content detected. Ensure valid playback.";

lazy_static! {
    static ref VIDEO_TAG: Regex = Regex::new(r"(?is)<video\b[^>]*>").expect("valid regex");
    static ref SRC_ATTR: Regex =
        Regex::new(r#"(?is)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("valid regex");
}

/// OLGA bookkeeping attached to content recovered from P2WSH outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OlgaAccounting {
    pub file_size_bytes: u32,
    pub burned_sats: u64,
}

/// Strip whitespace and right-pad with `=` to a multiple of 4
pub fn normalize_base64(data: &str) -> String {
    let mut cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let padding = (4 - cleaned.len() % 4) % 4;
    cleaned.extend(std::iter::repeat('=').take(padding));
    cleaned
}

/// Decode the base64 text of a stamp
pub fn decode_stamp_content(
    data: &str,
    encoding: StampEncoding,
    olga: Option<OlgaAccounting>,
) -> DecoderResult<StampContent> {
    let normalized = normalize_base64(data);
    if normalized.is_empty() {
        return Err(DecoderError::EmptyContent);
    }

    let original_bytes = BASE64_LENIENT.decode(&normalized)?;

    let (compression, payload) = if normalized.starts_with(GZIP_PREFIX) {
        let mut decompressed = Vec::new();
        GzDecoder::new(original_bytes.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(DecoderError::Decompression)?;
        debug!(
            "Gunzipped stamp content: {} -> {} bytes",
            original_bytes.len(),
            decompressed.len()
        );
        (Compression::Gzip, decompressed)
    } else {
        (Compression::None, original_bytes.clone())
    };

    let payload_base64 = STANDARD.encode(&payload);
    let mime = sniff_mime(&payload_base64, &original_bytes);

    let mut content = StampContent {
        encoding,
        compression,
        mime_type: mime,
        payload_base64,
        file_size_bytes: None,
        burned_sats: None,
        burned_btc: None,
        video_src: None,
        note: None,
    };

    if let Some(accounting) = olga {
        content.file_size_bytes = Some(accounting.file_size_bytes);
        content.burned_sats = Some(accounting.burned_sats);
        content.burned_btc = Some(format_btc(accounting.burned_sats));
    }

    if mime == StampMime::Html {
        if let Some(src) = find_video_src(&String::from_utf8_lossy(&payload)) {
            content.mime_type = StampMime::Mp4;
            content.video_src = Some(encode_uri(&src));
            content.note = Some(VIDEO_NOTE.to_string());
        }
    }

    Ok(content)
}

/// Prefix table first, then JSON over the pre-decompression bytes, else HTML
pub fn sniff_mime(payload_base64: &str, original_bytes: &[u8]) -> StampMime {
    if let Some(mime) = StampMime::sniff_base64_prefix(payload_base64) {
        return mime;
    }
    if parses_as_json_document(original_bytes) {
        return StampMime::Json;
    }
    StampMime::Html
}

/// Falsy JSON scalars (`null`, `false`, `0`, `""`) do not count as documents
fn parses_as_json_document(bytes: &[u8]) -> bool {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Null) | Ok(Value::Bool(false)) => false,
        Ok(Value::Number(n)) => n.as_f64() != Some(0.0),
        Ok(Value::String(s)) => !s.is_empty(),
        Ok(_) => true,
        Err(_) => false,
    }
}

/// `src` of the first `<video>` element, entity-decoded; `None` if absent or empty
pub fn find_video_src(html: &str) -> Option<String> {
    let tag = VIDEO_TAG.find(html)?;
    let captures = SRC_ATTR.captures(tag.as_str())?;
    let raw = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?
        .as_str();
    let src = decode_entities(raw);
    if src.is_empty() {
        None
    } else {
        Some(src)
    }
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
