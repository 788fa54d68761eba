//! Counterparty issuance and subasset message decoding
//!
//! Layout after the message id, all big-endian:
//!
//! ```text
//! asset_id: u64 | quantity: u64 | divisible: u8 | lock: u8 | reset: u8
//! [subasset only] name_len: u8 | name: name_len bytes (base-68 integer)
//! description: remaining bytes (latin-1)
//! ```

use super::error::{DecoderError, DecoderResult};
use crate::types::counterparty::{
    AssetIssuance, CounterpartyMessageType, IssuanceRecord, SubassetRecord, ISSUANCE_FIXED_LEN,
};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

/// Subasset name alphabet, 67 symbols in base 68; a symbol's value is its
/// position plus one
pub const SUBASSET_DIGITS: &[u8; 67] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.-_@!";

const SUBASSET_BASE: u32 = 68;

/// Literal that marks a description as stamp content
pub const STAMP_PREFIX: &str = "stamp:";

/// Issuance fields plus the undecoded description bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIssuance {
    pub issuance: AssetIssuance,
    pub description: Vec<u8>,
}

impl DecodedIssuance {
    /// Description as text, one char per byte (latin-1)
    pub fn description_text(&self) -> String {
        self.description.iter().map(|&b| b as char).collect()
    }
}

/// Decode the body of an issuance or subasset message
pub fn parse_issuance(
    message_type: CounterpartyMessageType,
    payload: &[u8],
) -> DecoderResult<DecodedIssuance> {
    if payload.len() < ISSUANCE_FIXED_LEN {
        return Err(DecoderError::InsufficientLength {
            context: "issuance",
            required: ISSUANCE_FIXED_LEN,
            available: payload.len(),
        });
    }

    let truncated = |_| DecoderError::InsufficientLength {
        context: "issuance",
        required: ISSUANCE_FIXED_LEN,
        available: payload.len(),
    };
    let mut cursor = Cursor::new(payload);
    let asset_id = cursor.read_u64::<BigEndian>().map_err(truncated)?;
    let quantity = cursor.read_u64::<BigEndian>().map_err(truncated)?;
    let divisible = cursor.read_u8().map_err(truncated)? != 0;
    let locked = cursor.read_u8().map_err(truncated)? != 0;
    let reset = cursor.read_u8().map_err(truncated)? != 0;

    let record = IssuanceRecord {
        asset_id: format!("A{}", asset_id),
        quantity,
        divisible,
        locked,
        reset,
    };

    let rest = &payload[ISSUANCE_FIXED_LEN..];
    if !message_type.is_subasset() {
        return Ok(DecodedIssuance {
            issuance: AssetIssuance::Issuance(record),
            description: rest.to_vec(),
        });
    }

    let (&name_len, rest) = rest
        .split_first()
        .ok_or(DecoderError::InsufficientLength {
            context: "subasset name length",
            required: ISSUANCE_FIXED_LEN + 1,
            available: payload.len(),
        })?;
    let name_len = name_len as usize;
    if rest.len() < name_len {
        return Err(DecoderError::SubassetLength {
            declared: name_len,
            available: rest.len(),
        });
    }
    let (name_bytes, description) = rest.split_at(name_len);

    Ok(DecodedIssuance {
        issuance: AssetIssuance::Subasset(SubassetRecord {
            issuance: record,
            subasset_name: expand_subasset_longname(name_bytes),
            subasset_raw_hex: hex::encode(name_bytes),
        }),
        description: description.to_vec(),
    })
}

/// Text after a case-insensitive `stamp:` prefix, if present
pub fn strip_stamp_prefix(description: &str) -> Option<&str> {
    let head = description.get(..STAMP_PREFIX.len())?;
    if head.eq_ignore_ascii_case(STAMP_PREFIX) {
        Some(&description[STAMP_PREFIX.len()..])
    } else {
        None
    }
}

/// Render a big-endian base-68 integer as a subasset name
///
/// Remainder 0 maps to the last symbol (`!`), matching the protocol's
/// reference decoder; names containing `!` therefore do not round-trip.
pub fn expand_subasset_longname(raw: &[u8]) -> String {
    let mut number = strip_leading_zeros(raw.to_vec());
    let mut symbols = Vec::new();

    while !number.is_empty() {
        let remainder = div_small(&mut number, SUBASSET_BASE) as usize;
        let index = if remainder == 0 {
            SUBASSET_DIGITS.len() - 1
        } else {
            remainder - 1
        };
        symbols.push(SUBASSET_DIGITS[index] as char);
    }

    symbols.iter().rev().collect()
}

/// Inverse of [`expand_subasset_longname`]; `None` for characters outside the alphabet
pub fn compact_subasset_longname(name: &str) -> Option<Vec<u8>> {
    let mut number: Vec<u8> = Vec::new();
    for c in name.bytes() {
        let value = SUBASSET_DIGITS.iter().position(|&d| d == c)? as u32 + 1;
        mul_add_small(&mut number, SUBASSET_BASE, value);
    }
    Some(number)
}

/// Divide a big-endian magnitude in place, returning the remainder
fn div_small(number: &mut Vec<u8>, divisor: u32) -> u32 {
    let mut remainder: u32 = 0;
    for byte in number.iter_mut() {
        let acc = (remainder << 8) | *byte as u32;
        *byte = (acc / divisor) as u8;
        remainder = acc % divisor;
    }
    let stripped = strip_leading_zeros(std::mem::take(number));
    *number = stripped;
    remainder
}

/// `number = number * multiplier + addend` on a big-endian magnitude
fn mul_add_small(number: &mut Vec<u8>, multiplier: u32, addend: u32) {
    let mut carry = addend;
    for byte in number.iter_mut().rev() {
        let acc = *byte as u32 * multiplier + carry;
        *byte = (acc & 0xff) as u8;
        carry = acc >> 8;
    }
    while carry > 0 {
        number.insert(0, (carry & 0xff) as u8);
        carry >>= 8;
    }
}

fn strip_leading_zeros(mut number: Vec<u8>) -> Vec<u8> {
    let leading = number.iter().take_while(|&&b| b == 0).count();
    number.drain(..leading);
    number
}
