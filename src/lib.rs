//! Bitcoin Stamps Decoder
//!
//! Recovers stamp artifacts embedded in Bitcoin transactions through
//! Counterparty issuances (OP_RETURN and bare multisig), OLGA P2WSH
//! outputs, and SRC-721 compositions.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod errors;
pub mod fetch;
pub mod processor;
pub mod registry;
pub mod types;
pub mod utils;
