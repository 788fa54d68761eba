//! Block logs, failure isolation and the status report

use crate::common::{issuance_message, stamp_description, Issuance, TxBuilder, GIF_B64, PNG_B64};
use stamp_decoder::decoder::{ArtifactStore, StampDecoder};
use stamp_decoder::processor::{build_status_report, BlockLog, BlockProcessor};
use stamp_decoder::registry::InMemoryRegistry;
use std::fs;
use tempfile::TempDir;

fn processor(temp_dir: &TempDir) -> BlockProcessor<InMemoryRegistry> {
    let store = ArtifactStore::new(
        temp_dir.path().join("files"),
        temp_dir.path().join("assets"),
    )
    .unwrap();
    BlockProcessor::new(
        StampDecoder::default(),
        InMemoryRegistry::new(),
        store,
        temp_dir.path().join("blocks"),
    )
    .unwrap()
}

#[test]
fn test_undecodable_stamp_does_not_abort_block() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);

    let good = TxBuilder::new(0x51, 800_000)
        .dust(5430)
        .op_return(&issuance_message(22, &Issuance::stamp(7_000_001), &stamp_description(PNG_B64)))
        .build();
    let broken = TxBuilder::new(0x52, 800_000)
        .op_return(&issuance_message(22, &Issuance::stamp(7_000_002), b"stamp:H4sIAAAAAAAA"))
        .build();
    let payment = TxBuilder::new(0x53, 800_000).change(90_000).build();

    let log = processor
        .process_transactions(800_000, &"ab".repeat(32), &[broken, payment, good])
        .unwrap();

    assert_eq!(log.stamps.len(), 1);
    assert_eq!(log.stamps[0].tx, "51".repeat(32));
    assert_eq!(log.stamps[0].asset, "A7000001");
    assert_eq!(log.stamps[0].file, format!("{}.png", "51".repeat(32)));
    assert_eq!(log.failures.len(), 1);
    assert_eq!(log.failures[0].tx, "52".repeat(32));

    let on_disk: BlockLog = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("blocks").join("800000.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(on_disk, log);
    assert!(temp_dir
        .path()
        .join("files")
        .join(format!("{}.png", "51".repeat(32)))
        .exists());
}

#[test]
fn test_status_report_over_scanned_blocks() {
    let temp_dir = TempDir::new().unwrap();
    let mut processor = processor(&temp_dir);

    for (height, txid_byte, base64) in [(800_000, 0x61, PNG_B64), (800_001, 0x62, GIF_B64), (800_003, 0x63, PNG_B64)] {
        let tx = TxBuilder::new(txid_byte, height)
            .op_return(&issuance_message(
                22,
                &Issuance::stamp(7_100_000 + height as u64),
                &stamp_description(base64),
            ))
            .build();
        processor
            .process_transactions(height, &"cd".repeat(32), &[tx])
            .unwrap();
    }

    let report = build_status_report(&temp_dir.path().join("blocks")).unwrap();
    assert_eq!(report.latest_block, Some(800_003));
    assert_eq!(report.total_stamps, 3);
    assert_eq!(report.mime_counts.get("image/png"), Some(&2));
    assert_eq!(report.mime_counts.get("image/gif"), Some(&1));
    assert_eq!(report.missing_heights, vec![800_002]);
}
