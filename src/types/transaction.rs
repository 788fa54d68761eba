//! Transaction shape consumed by the stamp decoder
//!
//! The decoder never parses Bitcoin wire format itself. It works on a
//! `DecodedTransaction` with pre-classified outputs, which is either built
//! from a `bitcoin::Transaction` (see [`DecodedTransaction::from_bitcoin`])
//! or deserialised from JSON.

use bitcoin::{Address, Network, Script, Transaction};
use serde::{Deserialize, Serialize};

/// OP_CHECKMULTISIG
const OP_CHECKMULTISIG: u8 = 0xae;
/// OP_1 .. OP_16 range used for the M and N counts of a bare multisig
const OP_1: u8 = 0x51;
const OP_16: u8 = 0x60;

/// Coarse output script classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// OP_RETURN null-data output
    OpReturn,
    /// Bare multisig shaped script (`OP_m <keys...> OP_n OP_CHECKMULTISIG`)
    LegacyMultisigLike,
    /// Witness v0 program (P2WPKH or P2WSH)
    SegwitV0,
    /// Witness v1 program (P2TR)
    Taproot,
    /// Pay-to-pubkey-hash
    Legacy,
    /// Pay-to-script-hash
    P2sh,
    Unknown,
}

impl OutputKind {
    /// Classify an output script
    pub fn classify(script: &Script) -> Self {
        if script.is_op_return() {
            OutputKind::OpReturn
        } else if is_bare_multisig(script.as_bytes()) {
            OutputKind::LegacyMultisigLike
        } else if script.is_p2wpkh() || script.is_p2wsh() {
            OutputKind::SegwitV0
        } else if script.is_p2tr() {
            OutputKind::Taproot
        } else if script.is_p2pkh() {
            OutputKind::Legacy
        } else if script.is_p2sh() {
            OutputKind::P2sh
        } else {
            OutputKind::Unknown
        }
    }
}

/// Loose bare multisig check: OP_m ... OP_n OP_CHECKMULTISIG
///
/// Counterparty data outputs carry arbitrary bytes in the key slots, so key
/// validity is deliberately not checked here.
fn is_bare_multisig(script: &[u8]) -> bool {
    if script.len() < 3 {
        return false;
    }
    let first = script[0];
    let n = script[script.len() - 2];
    let last = script[script.len() - 1];
    last == OP_CHECKMULTISIG && (OP_1..=OP_16).contains(&first) && (OP_1..=OP_16).contains(&n)
}

/// A transaction output as supplied by the transaction parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    pub index: u32,
    pub value_sats: u64,
    #[serde(with = "hex")]
    pub script: Vec<u8>,
    pub kind: OutputKind,
    /// Mainnet address for the script, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A transaction input as supplied by the transaction parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    pub index: u32,
    /// Previous txid as hex, in the byte order the parser supplies it
    pub prev_tx_id: String,
    pub prev_output_index: u32,
    pub sequence: u32,
}

/// One confirmed transaction, the unit of work for the decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransaction {
    pub txid: String,
    pub block_height: u32,
    pub inputs: Vec<RawInput>,
    pub outputs: Vec<RawOutput>,
}

impl DecodedTransaction {
    /// First input, whose previous txid keys the ARC4 cipher
    pub fn first_input(&self) -> Option<&RawInput> {
        self.inputs.first()
    }

    /// Build the decoder's view of a parsed Bitcoin transaction
    ///
    /// Previous txids use the display (RPC) hex order, which is what
    /// Counterparty keys its cipher with.
    pub fn from_bitcoin(tx: &Transaction, block_height: u32) -> Self {
        let inputs = tx
            .input
            .iter()
            .enumerate()
            .map(|(index, input)| RawInput {
                index: index as u32,
                prev_tx_id: input.previous_output.txid.to_string(),
                prev_output_index: input.previous_output.vout,
                sequence: input.sequence.0,
            })
            .collect();

        let outputs = tx
            .output
            .iter()
            .enumerate()
            .map(|(index, output)| {
                let script = output.script_pubkey.as_script();
                RawOutput {
                    index: index as u32,
                    value_sats: output.value.to_sat(),
                    script: script.to_bytes(),
                    kind: OutputKind::classify(script),
                    address: Address::from_script(script, Network::Bitcoin)
                        .ok()
                        .map(|address| address.to_string()),
                }
            })
            .collect();

        Self {
            txid: tx.compute_txid().to_string(),
            block_height,
            inputs,
            outputs,
        }
    }
}
