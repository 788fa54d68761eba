//! Payload extraction for Bitcoin Stamps
//!
//! Walks a transaction's outputs in index order and splits them into the
//! Counterparty message stream (OP_RETURN and bare multisig outputs) and the
//! OLGA chunk list (P2WSH outputs). Each output yields an [`OutputOutcome`];
//! a malformed output is recorded as skipped and scanning continues.

use crate::crypto::arc4;
use crate::types::counterparty::COUNTERPARTY_PREFIX;
use crate::types::stamps::StampEncoding;
use crate::types::{DecodedTransaction, OutputKind, RawOutput};
use tracing::debug;

const OP_RETURN: u8 = 0x6a;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;

/// P2WSH program: `OP_0 <32 bytes>`
const P2WSH_SCRIPT_LEN: usize = 34;
const P2WSH_PREFIX: [u8; 2] = [0x00, 0x20];

/// Text prefix that marks an unciphered SRC-721 OP_RETURN
const OP_TEXT_PREFIX: &str = "721";

/// Bare multisig sub-format, chosen by script length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultisigLayout {
    /// 71-byte script: plaintext, length byte at offset 36
    Plaintext,
    /// 105-byte script: ciphered data in bytes 3..34 and 37..68
    Ciphered,
    /// Any other length: the whole script is ciphered
    Generic,
}

impl MultisigLayout {
    pub const PLAINTEXT_SCRIPT_LEN: usize = 71;
    pub const CIPHERED_SCRIPT_LEN: usize = 105;

    /// Offset of the length byte in the plaintext layout
    const PLAINTEXT_LENGTH_OFFSET: usize = 36;

    pub fn for_script(script: &[u8]) -> Self {
        match script.len() {
            Self::PLAINTEXT_SCRIPT_LEN => MultisigLayout::Plaintext,
            Self::CIPHERED_SCRIPT_LEN => MultisigLayout::Ciphered,
            _ => MultisigLayout::Generic,
        }
    }

    /// Message transport this layout belongs to
    pub fn encoding(&self) -> StampEncoding {
        match self {
            MultisigLayout::Plaintext => StampEncoding::Classic,
            MultisigLayout::Ciphered | MultisigLayout::Generic => StampEncoding::Multisig,
        }
    }

    /// Pull this output's contribution to the message stream
    pub fn extract(&self, script: &[u8], key: &[u8]) -> Result<Vec<u8>, SkipReason> {
        match self {
            MultisigLayout::Plaintext => extract_plaintext(script),
            MultisigLayout::Ciphered => {
                let mut ciphertext = Vec::with_capacity(62);
                ciphertext.extend_from_slice(&script[3..34]);
                ciphertext.extend_from_slice(&script[37..68]);
                extract_length_prefixed(&decipher(&ciphertext, key)?)
            }
            MultisigLayout::Generic => extract_length_prefixed(&decipher(script, key)?),
        }
    }
}

fn decipher(data: &[u8], key: &[u8]) -> Result<Vec<u8>, SkipReason> {
    arc4::decrypt(data, key).ok_or(SkipReason::Undecipherable)
}

/// 71-byte layout: `len` plaintext bytes follow the length byte
fn extract_plaintext(script: &[u8]) -> Result<Vec<u8>, SkipReason> {
    let offset = MultisigLayout::PLAINTEXT_LENGTH_OFFSET;
    let declared = script[offset] as usize;
    let data = &script[offset + 1..];
    take_declared(data, declared).map(<[u8]>::to_vec)
}

/// Deciphered layouts: length byte at 0, then data, magic stripped if present
fn extract_length_prefixed(plaintext: &[u8]) -> Result<Vec<u8>, SkipReason> {
    let (&declared, data) = plaintext.split_first().ok_or(SkipReason::Empty)?;
    let payload = take_declared(data, declared as usize)?;
    Ok(payload
        .strip_prefix(COUNTERPARTY_PREFIX)
        .unwrap_or(payload)
        .to_vec())
}

fn take_declared(data: &[u8], declared: usize) -> Result<&[u8], SkipReason> {
    if declared == 0 {
        return Err(SkipReason::Empty);
    }
    if declared > data.len() {
        return Err(SkipReason::LengthOutOfRange {
            declared,
            available: data.len(),
        });
    }
    Ok(&data[..declared])
}

/// First data push of an OP_RETURN script
pub fn op_return_push_data(script: &[u8]) -> Result<&[u8], SkipReason> {
    let (&opcode, rest) = match script.split_first() {
        Some((&OP_RETURN, rest)) => rest.split_first().ok_or(SkipReason::Empty)?,
        _ => return Err(SkipReason::NotOpReturn),
    };

    let (declared, data) = match opcode {
        1..=75 => (opcode as usize, rest),
        OP_PUSHDATA1 => {
            let (&len, data) = rest.split_first().ok_or(SkipReason::Empty)?;
            (len as usize, data)
        }
        OP_PUSHDATA2 if rest.len() >= 2 => {
            (u16::from_le_bytes([rest[0], rest[1]]) as usize, &rest[2..])
        }
        OP_PUSHDATA4 if rest.len() >= 4 => (
            u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize,
            &rest[4..],
        ),
        _ => return Err(SkipReason::Empty),
    };
    take_declared(data, declared)
}

/// Why an output did not contribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Output carries no data bytes
    Empty,
    /// Declared length runs past the available bytes
    LengthOutOfRange { declared: usize, available: usize },
    /// Deciphered OP_RETURN does not start with the Counterparty magic
    MissingMagic,
    /// Output kind says OP_RETURN but the script does not start with it
    NotOpReturn,
    /// Cipher rejected the data or key
    Undecipherable,
}

/// Per-output extraction result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputOutcome {
    /// Bytes appended to the message stream
    Message {
        index: u32,
        encoding: StampEncoding,
        bytes: usize,
    },
    /// P2WSH output collected for OLGA reassembly
    OlgaChunk { index: u32 },
    /// Data-shaped output that was rejected
    Skipped { index: u32, reason: SkipReason },
}

/// One P2WSH output's script and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlgaChunk {
    pub script: Vec<u8>,
    pub value_sats: u64,
}

/// Everything the extractor pulled out of one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPayload {
    /// Accumulated message stream, possibly still magic-prefixed
    pub message: Vec<u8>,
    /// Transport of the last output that contributed to `message`
    pub encoding: Option<StampEncoding>,
    pub olga_chunks: Vec<OlgaChunk>,
    /// Unciphered `721|...` OP_RETURN text
    pub op_text: Option<String>,
    pub outcomes: Vec<OutputOutcome>,
}

impl ExtractedPayload {
    /// Message stream with one leading Counterparty magic removed
    pub fn message_body(&self) -> &[u8] {
        self.message
            .strip_prefix(COUNTERPARTY_PREFIX)
            .unwrap_or(&self.message)
    }

    /// OLGA applies when chunks exist and the message was not multisig-ciphered
    pub fn uses_olga(&self) -> bool {
        !self.olga_chunks.is_empty() && self.encoding != Some(StampEncoding::Multisig)
    }

    /// Transport to report for the classic (non-OLGA) path
    pub fn message_encoding(&self) -> StampEncoding {
        self.encoding.unwrap_or(StampEncoding::Classic)
    }

    fn skip(&mut self, output: &RawOutput, reason: SkipReason) {
        debug!("Output {} skipped: {:?}", output.index, reason);
        self.outcomes.push(OutputOutcome::Skipped {
            index: output.index,
            reason,
        });
    }

    fn append(&mut self, output: &RawOutput, encoding: StampEncoding, bytes: &[u8]) {
        self.message.extend_from_slice(bytes);
        self.encoding = Some(encoding);
        self.outcomes.push(OutputOutcome::Message {
            index: output.index,
            encoding,
            bytes: bytes.len(),
        });
    }
}

/// Scan every output of `tx` in index order
pub fn extract_payload(tx: &DecodedTransaction) -> ExtractedPayload {
    let key = arc4::key_for_first_input(tx.first_input());
    let mut extracted = ExtractedPayload::default();

    for output in &tx.outputs {
        match output.kind {
            OutputKind::OpReturn => extract_op_return(&mut extracted, output, &key),
            OutputKind::LegacyMultisigLike => {
                let layout = MultisigLayout::for_script(&output.script);
                match layout.extract(&output.script, &key) {
                    Ok(bytes) => extracted.append(output, layout.encoding(), &bytes),
                    Err(reason) => extracted.skip(output, reason),
                }
            }
            OutputKind::SegwitV0 if is_p2wsh(&output.script) => {
                extracted.olga_chunks.push(OlgaChunk {
                    script: output.script.clone(),
                    value_sats: output.value_sats,
                });
                extracted
                    .outcomes
                    .push(OutputOutcome::OlgaChunk { index: output.index });
            }
            _ => {}
        }
    }

    extracted
}

fn extract_op_return(extracted: &mut ExtractedPayload, output: &RawOutput, key: &[u8]) {
    let data = match op_return_push_data(&output.script) {
        Ok(data) => data,
        Err(reason) => return extracted.skip(output, reason),
    };

    let plaintext = arc4::decrypt(data, key).unwrap_or_default();
    if plaintext.starts_with(COUNTERPARTY_PREFIX) {
        extracted.append(output, StampEncoding::Classic, &plaintext);
        return;
    }

    if extracted.op_text.is_none() {
        if let Ok(text) = std::str::from_utf8(data) {
            if text.starts_with(OP_TEXT_PREFIX) {
                extracted.op_text = Some(text.to_string());
            }
        }
    }
    extracted.skip(output, SkipReason::MissingMagic);
}

fn is_p2wsh(script: &[u8]) -> bool {
    script.len() == P2WSH_SCRIPT_LEN && script.starts_with(&P2WSH_PREFIX)
}
