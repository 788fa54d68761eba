/// Cryptographic utilities for the Counterparty stamp envelope
///
/// This module provides the ARC4 stream cipher Counterparty uses to
/// obfuscate the payloads it embeds in OP_RETURN and multisig outputs.
pub mod arc4;
