//! JSON data type classification for Bitcoin Stamps protocols

use serde_json::Value;

/// JSON data type classification for Bitcoin Stamps protocols
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonType {
    /// SRC-20 tokens (fungible tokens)
    SRC20,
    /// SRC-721 composable NFTs
    SRC721,
    /// Generic JSON data
    Generic,
}

/// Classify a parsed JSON document by its protocol (`"p"`) field
pub fn classify_json_value(value: &Value) -> JsonType {
    let protocol = value
        .as_object()
        .and_then(|obj| obj.get("p"))
        .and_then(|v| v.as_str())
        .map(|p| p.to_ascii_lowercase());

    match protocol.as_deref() {
        Some("src-20") | Some("src20") => JsonType::SRC20, // Both with and without hyphen
        Some("src-721") => JsonType::SRC721,
        _ => JsonType::Generic,
    }
}

/// Classify raw JSON bytes; anything that does not parse is `Generic`
pub fn classify_json_data(json_bytes: &[u8]) -> JsonType {
    let data_str = String::from_utf8_lossy(json_bytes);
    match serde_json::from_str::<Value>(data_str.trim()) {
        Ok(parsed) => classify_json_value(&parsed),
        Err(_) => JsonType::Generic,
    }
}
