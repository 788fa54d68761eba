//! Bitcoin Stamps decoder
//!
//! Decodes one transaction at a time:
//!
//! 1. [`extraction`] pulls the Counterparty message stream out of OP_RETURN
//!    and bare multisig outputs, and collects OLGA chunks.
//! 2. [`envelope`] splits off the message id and keeps only issuances.
//! 3. [`issuance`] decodes the fixed fields and the `stamp:` description.
//! 4. [`content`] (or [`olga`] first) recovers and types the payload.
//! 5. [`src721`] composes SRC-721 mints against the collection registry.
//!
//! A transaction without stamp content yields `Ok(None)`. Errors are
//! reserved for recognised but malformed stamps.

pub mod content;
pub mod envelope;
pub mod error;
pub mod extraction;
pub mod issuance;
pub mod olga;
pub mod output;
pub mod src721;

pub use error::{DecoderError, DecoderResult};
pub use output::ArtifactStore;

use crate::config::DecoderConfig;
use crate::registry::{ArtifactSource, CollectionRegistry};
use crate::types::content_detection::StampMime;
use crate::types::counterparty::SUBASSET_ACTIVATION_HEIGHT;
use crate::types::stamps::{
    classify_json_data, BitcoinData, JsonType, Src721Document, StampContent, StampEncoding,
    StampRecord,
};
use crate::types::{DecodedTransaction, OutputKind};
use crate::utils::currency::format_btc;
use extraction::ExtractedPayload;
use serde_json::Value;
use tracing::{debug, info};

/// Per-transaction stamp decoder
///
/// Holds no cross-transaction state; the SRC-721 registry is passed in by the
/// caller on every call.
#[derive(Debug, Clone, Copy)]
pub struct StampDecoder {
    subasset_activation: u32,
}

impl Default for StampDecoder {
    fn default() -> Self {
        Self::new(SUBASSET_ACTIVATION_HEIGHT)
    }
}

impl StampDecoder {
    pub fn new(subasset_activation: u32) -> Self {
        Self {
            subasset_activation,
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.subasset_activation_height)
    }

    /// Decode `tx`, returning `Ok(None)` when it carries no stamp
    pub fn decode(
        &self,
        tx: &DecodedTransaction,
        registry: &mut dyn CollectionRegistry,
        artifacts: &dyn ArtifactSource,
    ) -> DecoderResult<Option<StampRecord>> {
        let extracted = extraction::extract_payload(tx);

        let Some(envelope) = envelope::parse_envelope(extracted.message_body()) else {
            debug!("{}: no Counterparty message", tx.txid);
            return Ok(None);
        };
        let Some(message_type) =
            envelope::stamp_message_type(&envelope, tx.block_height, self.subasset_activation)
        else {
            return Ok(None);
        };

        let decoded = issuance::parse_issuance(message_type, &envelope.payload)?;
        let description = decoded.description_text();

        let content = match issuance::strip_stamp_prefix(&description) {
            Some(data) => Some(self.decode_content(data, &extracted)?),
            None => {
                debug!(
                    "{}: issuance {} description is not stamp content",
                    tx.txid,
                    decoded.issuance.asset_id()
                );
                None
            }
        };

        let src721 = match src721_document(content.as_ref(), &extracted) {
            Some(document) => src721::apply_src721(
                &document,
                &decoded.issuance,
                content.as_ref(),
                registry,
                artifacts,
            )?,
            None => None,
        };

        let record = StampRecord {
            bitcoin_data: bitcoin_data(tx),
            message_id: envelope.message_id,
            description: match content {
                Some(_) => None,
                None => Some(description).filter(|text| !text.is_empty()),
            },
            issuance: decoded.issuance,
            content,
            src721,
        };

        match record.mime() {
            Some(mime) => info!(
                "Decoded stamp {} in {} ({})",
                record.asset_id(),
                tx.txid,
                mime
            ),
            None => debug!("Issuance {} in {} has no content", record.asset_id(), tx.txid),
        }
        Ok(Some(record))
    }

    fn decode_content(
        &self,
        data: &str,
        extracted: &ExtractedPayload,
    ) -> DecoderResult<StampContent> {
        if extracted.uses_olga() {
            let file = olga::reassemble(&extracted.olga_chunks)?;
            debug!(
                "OLGA file of {} bytes from {} chunks",
                file.bytes.len(),
                extracted.olga_chunks.len()
            );
            return content::decode_stamp_content(
                &file.to_base64(),
                StampEncoding::Olga,
                Some(file.accounting),
            );
        }
        content::decode_stamp_content(data, extracted.message_encoding(), None)
    }
}

/// SRC-721 document from JSON content, else from `721|...` op-text
fn src721_document(
    content: Option<&StampContent>,
    extracted: &ExtractedPayload,
) -> Option<Src721Document> {
    let from_content = content
        .filter(|content| content.mime_type == StampMime::Json)
        .and_then(|content| content.payload_bytes().ok())
        .and_then(|bytes| {
            let json_type = classify_json_data(&bytes);
            if json_type == JsonType::SRC20 {
                debug!("SRC-20 JSON stored as a plain stamp");
            }
            serde_json::from_slice::<Value>(&bytes).ok()
        })
        .and_then(|value| Src721Document::from_value(&value));

    from_content.or_else(|| {
        extracted
            .op_text
            .as_deref()
            .and_then(src721::parse_op_text)
            .and_then(|value| Src721Document::from_value(&value))
    })
}

/// Recipient and dust amount come from a P2PKH first output
fn bitcoin_data(tx: &DecodedTransaction) -> BitcoinData {
    let dust_output = tx
        .outputs
        .first()
        .filter(|output| output.kind == OutputKind::Legacy);

    BitcoinData {
        tx_id: tx.txid.clone(),
        block_height: tx.block_height,
        recipient: dust_output.and_then(|output| output.address.clone()),
        dust_sats: dust_output.map(|output| output.value_sats),
        dust_btc: dust_output.map(|output| format_btc(output.value_sats)),
    }
}
