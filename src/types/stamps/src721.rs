//! SRC-721 composable NFT documents and collection descriptors

use super::json::{classify_json_value, JsonType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SRC-721 operation named by the `op` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Src721Op {
    Deploy,
    Mint,
    Other(String),
}

impl Src721Op {
    fn parse(op: &str) -> Self {
        match op.to_ascii_lowercase().as_str() {
            "deploy" => Src721Op::Deploy,
            "mint" => Src721Op::Mint,
            other => Src721Op::Other(other.to_string()),
        }
    }
}

/// The fields of an SRC-721 JSON document the compositor consumes
///
/// The same shape is produced from JSON stamp content and from `721|...`
/// op-text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Src721Document {
    pub op: Src721Op,
    /// `c`: collection asset id referenced by a mint
    pub collection: Option<String>,
    /// `ts`: per-slot trait index selected by a mint; empty when absent or
    /// when any entry is not an index
    pub trait_selection: Vec<u32>,
    pub viewbox: Option<String>,
    pub image_rendering: Option<String>,
    /// `type`: content type prefix for minted trait images
    pub content_type: Option<String>,
    /// `t0`, `t1`, ...: asset ids available in each trait slot
    pub trait_slots: Vec<Vec<String>>,
}

impl Src721Document {
    /// Read an SRC-721 document from parsed JSON
    ///
    /// Returns `None` unless `p` is `src-721` (any case) and `op` is present.
    pub fn from_value(value: &Value) -> Option<Self> {
        if classify_json_value(value) != JsonType::SRC721 {
            return None;
        }
        let obj = value.as_object()?;
        let op = Src721Op::parse(obj.get("op").and_then(Value::as_str)?);

        let trait_selection = obj
            .get("ts")
            .and_then(parse_trait_selection)
            .unwrap_or_default();

        let mut trait_slots = Vec::new();
        while let Some(slot) = obj.get(&format!("t{}", trait_slots.len())) {
            trait_slots.push(string_list(slot));
        }

        Some(Self {
            op,
            collection: obj.get("c").and_then(scalar_string),
            trait_selection,
            viewbox: obj.get("viewbox").and_then(scalar_string),
            image_rendering: obj.get("image-rendering").and_then(scalar_string),
            content_type: obj.get("type").and_then(scalar_string),
            trait_slots,
        })
    }
}

/// String or number rendered as a string
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Slot-ordered indices; `None` if any entry is not an index
fn parse_trait_selection(value: &Value) -> Option<Vec<u32>> {
    let entries: Vec<String> = match value {
        Value::Array(items) => items.iter().map(scalar_string).collect::<Option<_>>()?,
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        other => vec![scalar_string(other)?],
    };
    entries
        .iter()
        .map(|entry| entry.trim().parse::<u32>().ok())
        .collect()
}

/// JSON array of scalars, or one comma-separated string
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

/// One asset referenced by a trait slot, with its artifact when it resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitRef {
    pub asset_id: String,
    /// Base64 of the stored artifact, `None` if it was not available at deploy
    pub blob: Option<String>,
}

/// Collection descriptor persisted by a deploy and read back by mints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Src721Collection {
    pub asset_id: String,
    pub trait_slots: Vec<Vec<TraitRef>>,
    pub view_box: String,
    pub image_rendering: String,
    pub content_type: String,
}

impl Src721Collection {
    /// Resolve `trait_slots[slot][index]` to its base64 blob
    pub fn trait_blob(&self, slot: usize, index: u32) -> Option<&str> {
        self.trait_slots
            .get(slot)?
            .get(index as usize)?
            .blob
            .as_deref()
    }
}

/// Rendering produced for a mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComposedOutput {
    /// SVG assembled from the selected trait images
    Svg { document: String },
    /// HTML collection: the transaction's own payload is the artifact
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Src721Mint {
    pub collection_asset_id: String,
    pub selected_trait_indices: Vec<u32>,
    pub composed_output: ComposedOutput,
}

/// What the compositor did with an SRC-721 transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Src721Outcome {
    Deploy {
        #[serde(rename = "collectionAssetId")]
        collection_asset_id: String,
        #[serde(rename = "traitSlots")]
        trait_slots: usize,
    },
    Mint(Src721Mint),
}
