//! OLGA reassembly
//!
//! OLGA stamps store the raw file across P2WSH outputs. Each output's
//! 32-byte program is a slice of the stream; the stream starts with a 2-byte
//! big-endian file size followed by the file bytes and zero padding.

use super::content::OlgaAccounting;
use super::error::{DecoderError, DecoderResult};
use super::extraction::OlgaChunk;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// `OP_0 OP_PUSHBYTES_32` in front of every chunk
const WITNESS_PROGRAM_PREFIX_LEN: usize = 2;
const FILE_SIZE_LEN: usize = 2;

/// File bytes recovered from the chunks, with burn accounting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlgaFile {
    pub bytes: Vec<u8>,
    pub accounting: OlgaAccounting,
}

impl OlgaFile {
    /// The file as base64, ready for the content decoder
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Concatenate chunk programs and cut out the length-prefixed file
pub fn reassemble(chunks: &[OlgaChunk]) -> DecoderResult<OlgaFile> {
    let mut stream = Vec::with_capacity(chunks.len() * 32);
    let mut burned_sats: u64 = 0;
    for chunk in chunks {
        stream.extend_from_slice(chunk.script.get(WITNESS_PROGRAM_PREFIX_LEN..).unwrap_or(&[]));
        burned_sats = burned_sats.saturating_add(chunk.value_sats);
    }

    if stream.len() < FILE_SIZE_LEN {
        return Err(DecoderError::OlgaBounds {
            declared: 0,
            available: stream.len(),
        });
    }
    let declared = u16::from_be_bytes([stream[0], stream[1]]) as usize;
    let body = &stream[FILE_SIZE_LEN..];
    if declared == 0 || body.len() < declared {
        return Err(DecoderError::OlgaBounds {
            declared,
            available: body.len(),
        });
    }

    Ok(OlgaFile {
        bytes: body[..declared].to_vec(),
        accounting: OlgaAccounting {
            file_size_bytes: declared as u32,
            burned_sats,
        },
    })
}
