//! Bitcoin Stamps transport and compression types

use serde::{Deserialize, Serialize};

/// How the stamp content reached the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StampEncoding {
    /// Issuance description in an OP_RETURN or plaintext multisig output
    Classic,
    /// Issuance description ciphered across bare multisig outputs
    Multisig,
    /// Raw file bytes in P2WSH outputs, announced by the issuance
    Olga,
}

impl StampEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            StampEncoding::Classic => "STAMP (Classic)",
            StampEncoding::Multisig => "STAMP (Multisig)",
            StampEncoding::Olga => "STAMP (OLGA)",
        }
    }
}

impl std::fmt::Display for StampEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compression {
    None,
    Gzip,
}
