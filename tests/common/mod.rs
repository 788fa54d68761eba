//! Common Test Utilities
//!
//! Builders for stamp-carrying transactions in every transport the decoder
//! understands. Payloads are ciphered with the funding txid exactly as a
//! Counterparty wallet would.
#![allow(dead_code)]

use stamp_decoder::crypto::arc4;
use stamp_decoder::decoder::issuance::compact_subasset_longname;
use stamp_decoder::registry::InMemoryRegistry;
use stamp_decoder::types::counterparty::COUNTERPARTY_PREFIX;
use stamp_decoder::types::stamps::StampRecord;
use stamp_decoder::types::{DecodedTransaction, OutputKind, RawInput, RawOutput};
use stamp_decoder::decoder::{DecoderResult, StampDecoder};

/// Previous txid of every fixture's first input, and so the cipher key
pub const FUNDING_TXID: &str = "7c0f3d6ab1e2c4f59a8b7e6d5c4b3a29180f1e2d3c4b5a69788796a5b4c3d2e1";

/// 1x1 transparent PNG
pub const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// 1x1 GIF
pub const GIF_B64: &str = "R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

pub const DUST_ADDRESS: &str = "1DYwPTpZuLjY2qApmJdHaSAuWRvEF5skCN";
pub const DUST_SCRIPT_HEX: &str = "76a91489abcdefabbaabbaabbaabbaabbaabbaabbaabba88ac";

pub fn cipher_key() -> Vec<u8> {
    hex::decode(FUNDING_TXID).unwrap()
}

/// Fixed issuance fields
#[derive(Debug, Clone, Copy)]
pub struct Issuance {
    pub asset_id: u64,
    pub quantity: u64,
    pub divisible: bool,
    pub locked: bool,
    pub reset: bool,
}

impl Issuance {
    /// Single locked edition, the usual stamp issuance
    pub fn stamp(asset_id: u64) -> Self {
        Self {
            asset_id,
            quantity: 1,
            divisible: false,
            locked: true,
            reset: false,
        }
    }

    pub fn fixed_fields(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(19);
        body.extend_from_slice(&self.asset_id.to_be_bytes());
        body.extend_from_slice(&self.quantity.to_be_bytes());
        body.push(self.divisible as u8);
        body.push(self.locked as u8);
        body.push(self.reset as u8);
        body
    }
}

pub fn stamp_description(base64: &str) -> Vec<u8> {
    format!("stamp:{}", base64).into_bytes()
}

/// Magic, message id, fixed fields, description
pub fn issuance_message(message_id: u8, issuance: &Issuance, description: &[u8]) -> Vec<u8> {
    let mut message = COUNTERPARTY_PREFIX.to_vec();
    message.push(message_id);
    message.extend_from_slice(&issuance.fixed_fields());
    message.extend_from_slice(description);
    message
}

/// Subasset message with `longname` compacted to base-68
pub fn subasset_message(
    message_id: u8,
    issuance: &Issuance,
    longname: &str,
    description: &[u8],
) -> Vec<u8> {
    let compact = compact_subasset_longname(longname).unwrap();
    let mut message = COUNTERPARTY_PREFIX.to_vec();
    message.push(message_id);
    message.extend_from_slice(&issuance.fixed_fields());
    message.push(compact.len() as u8);
    message.extend_from_slice(&compact);
    message.extend_from_slice(description);
    message
}

/// Builds a `DecodedTransaction` output by output
pub struct TxBuilder {
    txid: String,
    block_height: u32,
    inputs: Vec<RawInput>,
    outputs: Vec<RawOutput>,
}

impl TxBuilder {
    pub fn new(txid_byte: u8, block_height: u32) -> Self {
        Self {
            txid: format!("{:02x}", txid_byte).repeat(32),
            block_height,
            inputs: vec![RawInput {
                index: 0,
                prev_tx_id: FUNDING_TXID.to_string(),
                prev_output_index: 2,
                sequence: 0xffff_fffd,
            }],
            outputs: Vec::new(),
        }
    }

    pub fn without_inputs(mut self) -> Self {
        self.inputs.clear();
        self
    }

    fn push(mut self, value_sats: u64, script: Vec<u8>, kind: OutputKind, address: Option<&str>) -> Self {
        self.outputs.push(RawOutput {
            index: self.outputs.len() as u32,
            value_sats,
            script,
            kind,
            address: address.map(str::to_string),
        });
        self
    }

    /// P2PKH dust output to the stamp recipient
    pub fn dust(self, value_sats: u64) -> Self {
        self.push(
            value_sats,
            hex::decode(DUST_SCRIPT_HEX).unwrap(),
            OutputKind::Legacy,
            Some(DUST_ADDRESS),
        )
    }

    /// ARC4-ciphered OP_RETURN carrying `message`
    pub fn op_return(self, message: &[u8]) -> Self {
        let ciphered = arc4::decrypt(message, &cipher_key()).unwrap();
        self.push(0, push_script(&ciphered), OutputKind::OpReturn, None)
    }

    /// Unciphered OP_RETURN text
    pub fn op_return_text(self, text: &str) -> Self {
        self.push(0, push_script(text.as_bytes()), OutputKind::OpReturn, None)
    }

    /// 71-byte multisig outputs carrying `message` in the clear, 32 bytes each
    pub fn plaintext_multisig(mut self, message: &[u8]) -> Self {
        for piece in message.chunks(32) {
            let mut script = vec![0x51, 0x21];
            script.extend_from_slice(&[0x02; 33]);
            script.push(0x21);
            script.push(piece.len() as u8);
            script.extend_from_slice(piece);
            script.resize(69, 0x00);
            script.extend_from_slice(&[0x52, 0xae]);
            self = self.push(7800, script, OutputKind::LegacyMultisigLike, None);
        }
        self
    }

    /// 105-byte 1-of-3 multisig outputs, each ciphered independently with
    /// the magic repeated in front of its slice of the message
    pub fn ciphered_multisig(mut self, message: &[u8]) -> Self {
        let body = message.strip_prefix(COUNTERPARTY_PREFIX).unwrap_or(message);
        for piece in body.chunks(61 - COUNTERPARTY_PREFIX.len()) {
            let mut plaintext = vec![(COUNTERPARTY_PREFIX.len() + piece.len()) as u8];
            plaintext.extend_from_slice(COUNTERPARTY_PREFIX);
            plaintext.extend_from_slice(piece);
            plaintext.resize(62, 0x00);
            let cipher = arc4::decrypt(&plaintext, &cipher_key()).unwrap();

            let mut script = vec![0x51, 0x21, 0x02];
            script.extend_from_slice(&cipher[..31]);
            script.push(0x00);
            script.extend_from_slice(&[0x21, 0x03]);
            script.extend_from_slice(&cipher[31..]);
            script.push(0x00);
            script.push(0x21);
            script.extend_from_slice(&[0x02; 33]);
            script.extend_from_slice(&[0x53, 0xae]);
            self = self.push(7800, script, OutputKind::LegacyMultisigLike, None);
        }
        self
    }

    /// P2WSH outputs holding `file` behind a 2-byte big-endian length
    pub fn olga(self, file: &[u8], value_sats: u64) -> Self {
        let mut stream = (file.len() as u16).to_be_bytes().to_vec();
        stream.extend_from_slice(file);
        self.olga_stream(&stream, value_sats)
    }

    /// P2WSH outputs over an arbitrary stream, zero-padded to 32 bytes
    pub fn olga_stream(mut self, stream: &[u8], value_sats: u64) -> Self {
        for piece in stream.chunks(32) {
            let mut script = vec![0x00, 0x20];
            script.extend_from_slice(piece);
            script.resize(34, 0x00);
            self = self.push(value_sats, script, OutputKind::SegwitV0, None);
        }
        self
    }

    /// P2WPKH change output
    pub fn change(self, value_sats: u64) -> Self {
        let mut script = vec![0x00, 0x14];
        script.extend_from_slice(&[0x5a; 20]);
        self.push(value_sats, script, OutputKind::SegwitV0, None)
    }

    pub fn build(self) -> DecodedTransaction {
        DecodedTransaction {
            txid: self.txid,
            block_height: self.block_height,
            inputs: self.inputs,
            outputs: self.outputs,
        }
    }
}

/// OP_RETURN with a single PUSHDATA2 push
fn push_script(data: &[u8]) -> Vec<u8> {
    let mut script = vec![0x6a, 0x4d];
    script.extend_from_slice(&(data.len() as u16).to_le_bytes());
    script.extend_from_slice(data);
    script
}

/// Decode against a throwaway in-memory registry
pub fn decode(tx: &DecodedTransaction) -> DecoderResult<Option<StampRecord>> {
    let mut registry = InMemoryRegistry::new();
    let artifacts = InMemoryRegistry::new();
    StampDecoder::default().decode(tx, &mut registry, &artifacts)
}
