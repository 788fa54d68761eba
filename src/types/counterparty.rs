use serde::{Deserialize, Serialize};

// Core protocol constants (Source: counterpartycore/lib/config.py)
pub const COUNTERPARTY_PREFIX: &[u8] = b"CNTRPRTY"; // 8-byte protocol identifier

/// First block at which subasset issuances (ids 21 and 23) are honoured
pub const SUBASSET_ACTIVATION_HEIGHT: u32 = 753_500;

/// Asset id (8) + quantity (8) + divisible, lock and reset flags (1 each)
pub const ISSUANCE_FIXED_LEN: usize = 19;

/// Issuance message types a stamp can ride on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterpartyMessageType {
    Issuance = 20,          // issuance.py - legacy issuance
    Subasset = 21,          // issuance.py - subasset issuance
    LockResetIssuance = 22, // issuance.py - issuance with lock/reset flags
    LockResetSubasset = 23, // issuance.py - subasset with lock/reset flags
}

impl CounterpartyMessageType {
    pub fn from_id(value: u8) -> Option<Self> {
        match value {
            20 => Some(Self::Issuance),
            21 => Some(Self::Subasset),
            22 => Some(Self::LockResetIssuance),
            23 => Some(Self::LockResetSubasset),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn is_subasset(self) -> bool {
        matches!(self, Self::Subasset | Self::LockResetSubasset)
    }

    /// Whether this message type is honoured at `block_height`
    pub fn is_active_at(self, block_height: u32, subasset_activation: u32) -> bool {
        !self.is_subasset() || block_height >= subasset_activation
    }
}

/// Message id plus the body that follows it, after magic stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterpartyEnvelope {
    pub message_id: u8,
    pub payload: Vec<u8>,
}

/// Fixed-width issuance fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceRecord {
    /// `"A"` followed by the decimal 64-bit asset id
    pub asset_id: String,
    pub quantity: u64,
    pub divisible: bool,
    pub locked: bool,
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubassetRecord {
    #[serde(flatten)]
    pub issuance: IssuanceRecord,
    pub subasset_name: String,
    pub subasset_raw_hex: String,
}

/// Issuance metadata of a stamp, with or without a subasset name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetIssuance {
    Issuance(IssuanceRecord),
    Subasset(SubassetRecord),
}

impl AssetIssuance {
    pub fn record(&self) -> &IssuanceRecord {
        match self {
            AssetIssuance::Issuance(record) => record,
            AssetIssuance::Subasset(subasset) => &subasset.issuance,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.record().asset_id
    }

    pub fn subasset_name(&self) -> Option<&str> {
        match self {
            AssetIssuance::Issuance(_) => None,
            AssetIssuance::Subasset(subasset) => Some(&subasset.subasset_name),
        }
    }

    /// Single-edition locked issuance, the precondition for an SRC-721 mint
    pub fn is_single_locked_edition(&self) -> bool {
        let record = self.record();
        record.locked && record.quantity == 1
    }
}
