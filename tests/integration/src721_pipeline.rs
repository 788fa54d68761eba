//! SRC-721 deploy and mint through the block processor

use crate::common::{issuance_message, stamp_description, Issuance, TxBuilder, GIF_B64, PNG_B64};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use stamp_decoder::decoder::{ArtifactStore, StampDecoder};
use stamp_decoder::processor::BlockProcessor;
use stamp_decoder::registry::{CollectionRegistry, SqliteRegistry};
use stamp_decoder::types::DecodedTransaction;
use std::fs;
use tempfile::TempDir;

const HEIGHT: u32 = 790_500;

fn processor(temp_dir: &TempDir) -> BlockProcessor<SqliteRegistry> {
    let registry = SqliteRegistry::open(temp_dir.path().join("src721.db")).unwrap();
    let store = ArtifactStore::new(
        temp_dir.path().join("files"),
        temp_dir.path().join("assets"),
    )
    .unwrap();
    BlockProcessor::new(
        StampDecoder::default(),
        registry,
        store,
        temp_dir.path().join("blocks"),
    )
    .unwrap()
}

fn json_stamp(txid_byte: u8, issuance: Issuance, value: serde_json::Value) -> DecodedTransaction {
    let description = stamp_description(&STANDARD.encode(value.to_string()));
    TxBuilder::new(txid_byte, HEIGHT)
        .op_return(&issuance_message(22, &issuance, &description))
        .build()
}

fn image_stamp(txid_byte: u8, asset_id: u64, base64: &str) -> DecodedTransaction {
    TxBuilder::new(txid_byte, HEIGHT)
        .op_return(&issuance_message(22, &Issuance::stamp(asset_id), &stamp_description(base64)))
        .build()
}

fn collection_block() -> Vec<DecodedTransaction> {
    let deploy = Issuance {
        asset_id: 6_000_000,
        quantity: 1000,
        divisible: false,
        locked: false,
        reset: false,
    };
    vec![
        image_stamp(0x41, 6_000_100, PNG_B64),
        image_stamp(0x42, 6_000_101, GIF_B64),
        json_stamp(
            0x43,
            deploy,
            json!({
                "p": "src-721",
                "op": "deploy",
                "viewbox": "0 0 24 24",
                "image-rendering": "pixelated",
                "type": "data:image/png;base64",
                "t0": ["A6000100"],
                "t1": ["A6000101"]
            }),
        ),
    ]
}

#[test]
fn test_deploy_then_mint_composes_svg() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);

    let mut block = collection_block();
    block.push(json_stamp(
        0x44,
        Issuance::stamp(6_000_001),
        json!({"p": "SRC-721", "op": "mint", "c": "A6000000", "ts": [0, 0]}),
    ));
    let log = processor
        .process_transactions(HEIGHT, &"00".repeat(32), &block)
        .unwrap();

    assert!(log.failures.is_empty());
    let mimes: Vec<&str> = log.stamps.iter().map(|s| s.mime.as_str()).collect();
    assert_eq!(
        mimes,
        vec!["image/png", "image/gif", "application/json", "image/svg+xml"]
    );
    assert_eq!(log.stamps[3].file, format!("{}.svg", "44".repeat(32)));
    assert_eq!(processor.registry().collection_count().unwrap(), 1);

    let stored = processor.registry().get_collection("A6000000").unwrap().unwrap();
    assert_eq!(stored.trait_slots.len(), 2);
    assert_eq!(stored.trait_slots[0][0].blob.as_deref(), Some(PNG_B64));

    let svg = fs::read_to_string(temp_dir.path().join("assets").join("A6000001")).unwrap();
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" image-rendering="pixelated">"#));
    assert!(svg.contains(&format!(r#"href="data:image/png;base64,{}""#, PNG_B64)));
    assert!(svg.contains(&format!(r#"href="data:image/png;base64,{}""#, GIF_B64)));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn test_op_text_mint() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);
    processor
        .process_transactions(HEIGHT, &"00".repeat(32), &collection_block())
        .unwrap();

    let mint = TxBuilder::new(0x45, HEIGHT + 1)
        .op_return(&issuance_message(22, &Issuance::stamp(6_000_002), b"trait pick"))
        .op_return_text("721|op:mint|c:A6000000|ts:0,0")
        .build();
    let log = processor
        .process_transactions(HEIGHT + 1, &"01".repeat(32), &[mint])
        .unwrap();

    assert_eq!(log.stamps.len(), 1);
    assert_eq!(log.stamps[0].mime, "image/svg+xml");
    assert_eq!(log.stamps[0].asset, "A6000002");
}

#[test]
fn test_rejected_mints_fall_back_to_plain_stamps() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);

    let unlocked = Issuance {
        locked: false,
        ..Issuance::stamp(6_000_003)
    };
    let multi_edition = Issuance {
        quantity: 2,
        ..Issuance::stamp(6_000_004)
    };
    let mint = json!({"p": "src-721", "op": "mint", "c": "A6000000", "ts": [0, 0]});

    let mut block = collection_block();
    block.push(json_stamp(0x46, unlocked, mint.clone()));
    block.push(json_stamp(0x47, multi_edition, mint));
    block.push(json_stamp(
        0x48,
        Issuance::stamp(6_000_005),
        json!({"p": "src-721", "op": "mint", "c": "A1", "ts": [0]}),
    ));
    block.push(json_stamp(
        0x49,
        Issuance::stamp(6_000_006),
        json!({"p": "src-721", "op": "mint", "c": "A6000000", "ts": [3, 0]}),
    ));
    block.push(json_stamp(
        0x4a,
        Issuance::stamp(6_000_007),
        json!({"p": "src-721", "op": "mint", "c": "A6000000", "ts": ["x", 0, 0]}),
    ));
    block.push(json_stamp(
        0x4b,
        Issuance::stamp(6_000_008),
        json!({"p": "src-721", "op": "mint", "c": "A6000000"}),
    ));

    let log = processor
        .process_transactions(HEIGHT, &"00".repeat(32), &block)
        .unwrap();
    let tail: Vec<(&str, &str)> = log.stamps[3..]
        .iter()
        .map(|s| (s.asset.as_str(), s.mime.as_str()))
        .collect();
    assert_eq!(
        tail,
        vec![
            ("A6000003", "application/json"),
            ("A6000004", "application/json"),
            ("A6000005", "application/json"),
            ("A6000006", "application/json"),
            ("A6000007", "application/json"),
            ("A6000008", "application/json"),
        ]
    );
}

#[test]
fn test_deploy_with_missing_trait_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);

    // Trait A6000101 is never stamped
    let mut block = collection_block();
    block.remove(1);
    block.push(json_stamp(
        0x4a,
        Issuance::stamp(6_000_007),
        json!({"p": "src-721", "op": "mint", "c": "A6000000", "ts": [0, 0]}),
    ));
    let log = processor
        .process_transactions(HEIGHT, &"00".repeat(32), &block)
        .unwrap();

    let stored = processor.registry().get_collection("A6000000").unwrap().unwrap();
    assert_eq!(stored.trait_slots[1][0].blob, None);
    assert_eq!(log.stamps.last().unwrap().mime, "application/json");
}
