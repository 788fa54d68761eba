//! SRC-721 compositor
//!
//! Deploys register a collection of trait slots; mints pick one trait per
//! slot and are rendered as a layered SVG (or passed through verbatim for
//! HTML collections). A mint that cannot be resolved is left to be stored as
//! a plain stamp.

use super::error::DecoderResult;
use crate::registry::{ArtifactSource, CollectionRegistry};
use crate::types::content_detection::StampMime;
use crate::types::counterparty::AssetIssuance;
use crate::types::stamps::{
    ComposedOutput, Src721Collection, Src721Document, Src721Mint, Src721Op, Src721Outcome,
    StampContent, TraitRef,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const OP_TEXT_MARKER: &str = "721";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// Trait image type assumed when a deploy does not declare one
pub const DEFAULT_TRAIT_TYPE: &str = "data:image/png;base64";

/// Parse `721|key:value|...` op-text into SRC-721 JSON shape
///
/// `ts` and `tN` values are comma-separated lists. Empty `ts` items are kept
/// so that a malformed selection is rejected rather than shifted. Returns
/// `None` when the text does not start with the `721` marker.
pub fn parse_op_text(text: &str) -> Option<Value> {
    let mut fields = text.trim().split('|');
    if fields.next()?.trim() != OP_TEXT_MARKER {
        return None;
    }

    let mut obj = Map::new();
    obj.insert("p".to_string(), Value::String("src-721".to_string()));
    for field in fields {
        let Some((key, value)) = field.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        let parsed = if is_list_key(key) {
            Value::Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| key == "ts" || !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            )
        } else {
            Value::String(value.to_string())
        };
        obj.insert(key.to_string(), parsed);
    }
    Some(Value::Object(obj))
}

/// `ts` and trait slot keys (`t0`, `t1`, ...) carry lists
fn is_list_key(key: &str) -> bool {
    key == "ts"
        || key
            .strip_prefix('t')
            .map_or(false, |n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Apply an SRC-721 document carried by the transaction that issued `issuance`
///
/// Returns `Ok(None)` whenever the transaction should be stored as a plain
/// stamp instead.
pub fn apply_src721(
    document: &Src721Document,
    issuance: &AssetIssuance,
    content: Option<&StampContent>,
    registry: &mut dyn CollectionRegistry,
    artifacts: &dyn ArtifactSource,
) -> DecoderResult<Option<Src721Outcome>> {
    match &document.op {
        Src721Op::Deploy => deploy(document, issuance, registry, artifacts).map(Some),
        Src721Op::Mint => mint(document, issuance, content, registry),
        Src721Op::Other(op) => {
            debug!("SRC-721 op '{}' stored as plain stamp", op);
            Ok(None)
        }
    }
}

fn deploy(
    document: &Src721Document,
    issuance: &AssetIssuance,
    registry: &mut dyn CollectionRegistry,
    artifacts: &dyn ArtifactSource,
) -> DecoderResult<Src721Outcome> {
    let asset_id = issuance.asset_id();

    let mut trait_slots = Vec::with_capacity(document.trait_slots.len());
    for (slot, assets) in document.trait_slots.iter().enumerate() {
        let mut refs = Vec::with_capacity(assets.len());
        for trait_asset in assets {
            let blob = artifacts
                .load_artifact(trait_asset)?
                .map(|bytes| STANDARD.encode(bytes));
            if blob.is_none() {
                warn!(
                    "SRC-721 collection {} slot t{}: no stored artifact for {}",
                    asset_id, slot, trait_asset
                );
            }
            refs.push(TraitRef {
                asset_id: trait_asset.clone(),
                blob,
            });
        }
        trait_slots.push(refs);
    }

    let collection = Src721Collection {
        asset_id: asset_id.to_string(),
        trait_slots,
        view_box: document.viewbox.clone().unwrap_or_default(),
        image_rendering: document.image_rendering.clone().unwrap_or_default(),
        content_type: document
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_TRAIT_TYPE.to_string()),
    };
    registry.put_collection(asset_id, &collection)?;
    info!(
        "SRC-721 collection {} deployed with {} trait slots",
        asset_id,
        collection.trait_slots.len()
    );

    Ok(Src721Outcome::Deploy {
        collection_asset_id: asset_id.to_string(),
        trait_slots: collection.trait_slots.len(),
    })
}

fn mint(
    document: &Src721Document,
    issuance: &AssetIssuance,
    content: Option<&StampContent>,
    registry: &mut dyn CollectionRegistry,
) -> DecoderResult<Option<Src721Outcome>> {
    if !issuance.is_single_locked_edition() {
        let record = issuance.record();
        debug!(
            "SRC-721 mint {} rejected: locked={} quantity={}",
            record.asset_id, record.locked, record.quantity
        );
        return Ok(None);
    }

    let Some(collection_id) = document.collection.as_deref() else {
        debug!("SRC-721 mint {} names no collection", issuance.asset_id());
        return Ok(None);
    };
    let Some(collection) = registry.get_collection(collection_id)? else {
        warn!(
            "SRC-721 mint {} references unknown collection {}",
            issuance.asset_id(),
            collection_id
        );
        return Ok(None);
    };

    let composed_output = if StampMime::is_html_type(&collection.content_type) {
        if content.is_none() {
            return Ok(None);
        }
        ComposedOutput::Html
    } else {
        let selection = &document.trait_selection;
        if selection.is_empty() || selection.len() > collection.trait_slots.len() {
            warn!(
                "SRC-721 mint {} selects {} traits from {} slots in {}",
                issuance.asset_id(),
                selection.len(),
                collection.trait_slots.len(),
                collection_id
            );
            return Ok(None);
        }
        match compose_svg(&collection, selection) {
            Some(svg) => ComposedOutput::Svg { document: svg },
            None => {
                warn!(
                    "SRC-721 mint {} has unresolved traits {:?} in {}",
                    issuance.asset_id(),
                    document.trait_selection,
                    collection_id
                );
                return Ok(None);
            }
        }
    };

    Ok(Some(Src721Outcome::Mint(Src721Mint {
        collection_asset_id: collection_id.to_string(),
        selected_trait_indices: document.trait_selection.clone(),
        composed_output,
    })))
}

/// Layer the selected trait of every slot into one SVG document
///
/// `None` if the selection is empty or any entry does not resolve to a
/// stored blob.
pub fn compose_svg(collection: &Src721Collection, selection: &[u32]) -> Option<String> {
    if selection.is_empty() {
        return None;
    }
    let mut images = String::new();
    for (slot, &index) in selection.iter().enumerate() {
        let blob = collection.trait_blob(slot, index)?;
        images.push_str(&format!(
            r#"<image href="{}" width="100%" height="100%"/>"#,
            escape_attr(&image_href(&collection.content_type, blob))
        ));
    }

    let mut svg = format!(r#"<svg xmlns="{}""#, SVG_NAMESPACE);
    if !collection.view_box.is_empty() {
        svg.push_str(&format!(r#" viewBox="{}""#, escape_attr(&collection.view_box)));
    }
    if !collection.image_rendering.is_empty() {
        svg.push_str(&format!(
            r#" image-rendering="{}""#,
            escape_attr(&collection.image_rendering)
        ));
    }
    svg.push('>');
    svg.push_str(&images);
    svg.push_str("</svg>");
    Some(svg)
}

/// `<type>,<blob>` data URI; a type already ending in `,` is used as is
fn image_href(content_type: &str, blob: &str) -> String {
    if content_type.ends_with(',') {
        format!("{}{}", content_type, blob)
    } else {
        format!("{},{}", content_type, blob)
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
