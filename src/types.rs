//! Bitcoin Stamps Decoder - Type System
//!
//! - `transaction`: the decoder's view of a transaction (`DecodedTransaction`)
//! - `counterparty`: Counterparty envelope and issuance types
//! - `content_detection`: MIME detection over base64 payloads
//! - `stamps`: decoded stamp records and SRC-721 shapes

mod transaction;

pub mod content_detection;
pub mod counterparty;
pub mod stamps;

pub use transaction::{DecodedTransaction, OutputKind, RawInput, RawOutput};
