/// ARC4 decryption wrapper around the `rc4` crate
///
/// Counterparty encrypts the data it embeds in OP_RETURN and bare multisig
/// outputs with ARC4 (RC4), keyed by the txid of the transaction's first
/// input. The cipher is symmetric: applying it twice with the same key
/// recovers the original bytes.
///
/// # Usage
///
/// ```rust
/// use stamp_decoder::crypto::arc4;
///
/// let key = hex::decode("abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890").unwrap();
/// let data = b"hello world";
///
/// // Encrypt the data
/// let encrypted = arc4::decrypt(data, &key).unwrap();
///
/// // Decrypt the data (ARC4 is symmetric)
/// let decrypted = arc4::decrypt(&encrypted, &key).unwrap();
/// assert_eq!(decrypted, data);
/// ```
use crate::types::RawInput;
use hex;
use rc4::{
    consts::{U32, U7},
    Key, KeyInit, Rc4, StreamCipher,
};

/// Length of a txid key
pub const TXID_KEY_LEN: usize = 32;

/// Key used when a transaction has no usable first input.
///
/// Decryption still runs so the caller never has to special-case the
/// missing input; the output simply never carries the protocol magic.
pub const MISSING_INPUT_KEY: &[u8] = b"unknown";

/// Decrypt data using the ARC4 algorithm with the given key
///
/// Note: ARC4 is a symmetric cipher, so this function can be used for both
/// encryption and decryption.
///
/// Returns `None` if the data is empty or the key is neither a 32-byte txid
/// nor [`MISSING_INPUT_KEY`].
pub fn decrypt(data: &[u8], key: &[u8]) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }

    let mut result = data.to_vec();
    match key.len() {
        TXID_KEY_LEN => {
            let mut cipher = Rc4::<U32>::new(Key::<U32>::from_slice(key));
            cipher.apply_keystream(&mut result);
        }
        7 if key == MISSING_INPUT_KEY => {
            let mut cipher = Rc4::<U7>::new(Key::<U7>::from_slice(key));
            cipher.apply_keystream(&mut result);
        }
        _ => return None,
    }
    Some(result)
}

/// Prepare ARC4 key from a transaction ID
///
/// Counterparty keys the cipher with the raw bytes of the first input's
/// previous txid, in the hex order supplied by the transaction parser.
///
/// Returns `None` if the hex is invalid.
pub fn prepare_key_from_txid(txid_hex: &str) -> Option<Vec<u8>> {
    hex::decode(txid_hex).ok()
}

/// Derive the cipher key for a transaction from its first input
///
/// Falls back to [`MISSING_INPUT_KEY`] when there is no first input or its
/// previous txid is not 32 bytes of valid hex.
pub fn key_for_first_input(first_input: Option<&RawInput>) -> Vec<u8> {
    first_input
        .and_then(|input| prepare_key_from_txid(&input.prev_tx_id))
        .filter(|key| key.len() == TXID_KEY_LEN)
        .unwrap_or_else(|| MISSING_INPUT_KEY.to_vec())
}
