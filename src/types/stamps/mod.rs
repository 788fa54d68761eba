//! Bitcoin Stamps result types
//!
//! A decoded stamp is one [`StampRecord`]: where it was found, the
//! Counterparty issuance that carried it, and optionally the recovered
//! content and SRC-721 composition. Decoding logic lives in
//! `crate::decoder`; this module only holds the data shapes.

pub mod json;
pub mod src721;
pub mod variant;

pub use json::{classify_json_data, classify_json_value, JsonType};
pub use src721::{
    ComposedOutput, Src721Collection, Src721Document, Src721Mint, Src721Op, Src721Outcome,
    TraitRef,
};
pub use variant::{Compression, StampEncoding};

use crate::types::content_detection::StampMime;
use crate::types::counterparty::AssetIssuance;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Content recovered from a `stamp:` description or OLGA outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampContent {
    pub encoding: StampEncoding,
    pub compression: Compression,
    pub mime_type: StampMime,
    /// Base64 of the payload, after gzip unwrapping
    pub payload_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burned_sats: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burned_btc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StampContent {
    /// Raw payload bytes
    pub fn payload_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.payload_base64)
    }
}

/// Where the stamp was found and who received the dust output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinData {
    pub tx_id: String,
    pub block_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dust_sats: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dust_btc: Option<String>,
}

/// Everything decoded from one stamp transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampRecord {
    pub bitcoin_data: BitcoinData,
    pub message_id: u8,
    pub issuance: AssetIssuance,
    /// Issuance description when it is not a `stamp:` payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<StampContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src721: Option<Src721Outcome>,
}

/// Bytes to persist for a record, with the file extension to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub mime: StampMime,
}

impl Artifact {
    pub fn extension(&self) -> &'static str {
        self.mime.extension()
    }
}

impl StampRecord {
    pub fn asset_id(&self) -> &str {
        self.issuance.asset_id()
    }

    pub fn mime(&self) -> Option<StampMime> {
        match &self.src721 {
            Some(Src721Outcome::Mint(Src721Mint {
                composed_output: ComposedOutput::Svg { .. },
                ..
            })) => Some(StampMime::Svg),
            Some(Src721Outcome::Mint(Src721Mint {
                composed_output: ComposedOutput::Html,
                ..
            })) => Some(StampMime::Html),
            _ => self.content.as_ref().map(|content| content.mime_type),
        }
    }

    /// The artifact to store, `None` for issuance-only records
    ///
    /// SRC-721 mints store their composed output; everything else stores the
    /// decoded payload under its sniffed MIME type.
    pub fn artifact(&self) -> Result<Option<Artifact>, base64::DecodeError> {
        if let Some(Src721Outcome::Mint(mint)) = &self.src721 {
            match &mint.composed_output {
                ComposedOutput::Svg { document } => {
                    return Ok(Some(Artifact {
                        bytes: document.as_bytes().to_vec(),
                        mime: StampMime::Svg,
                    }));
                }
                ComposedOutput::Html => {
                    if let Some(content) = &self.content {
                        return Ok(Some(Artifact {
                            bytes: content.payload_bytes()?,
                            mime: StampMime::Html,
                        }));
                    }
                }
            }
        }

        match &self.content {
            Some(content) => Ok(Some(Artifact {
                bytes: content.payload_bytes()?,
                mime: content.mime_type,
            })),
            None => Ok(None),
        }
    }
}
