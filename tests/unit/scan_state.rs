//! Checkpoint resume and status reporting over hand-written state files

use stamp_decoder::errors::AppError;
use stamp_decoder::processor::{build_status_report, resume_height, BlockLog, Checkpoint, StampLogEntry};
use std::fs;
use tempfile::TempDir;

fn write_log(dir: &std::path::Path, height: u32, mimes: &[&str]) {
    let log = BlockLog {
        height,
        hash: "00".repeat(32),
        stamps: mimes
            .iter()
            .enumerate()
            .map(|(i, mime)| StampLogEntry {
                tx: format!("{:064x}", i),
                asset: format!("A{}", 1000 + i),
                mime: mime.to_string(),
                file: format!("{:064x}.bin", i),
            })
            .collect(),
        failures: vec![],
    };
    fs::write(
        dir.join(format!("{}.json", height)),
        serde_json::to_string_pretty(&log).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_resume_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("checkpoint.json");

    assert_eq!(resume_height(&path, None, 779_652).unwrap(), 779_652);

    Checkpoint::new(800_010).save(&path).unwrap();
    assert_eq!(resume_height(&path, None, 779_652).unwrap(), 800_011);
    assert_eq!(resume_height(&path, Some(700_000), 779_652).unwrap(), 700_000);

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\"lastHeight\": 800010"));
    assert!(saved.contains("\"updatedAt\""));
}

#[test]
fn test_corrupt_checkpoint_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("checkpoint.json");
    fs::write(&path, "{\"lastHeight\": \"soon\"}").unwrap();

    assert!(matches!(
        resume_height(&path, None, 1),
        Err(AppError::Checkpoint(_))
    ));
    // An explicit start never reads the file
    assert_eq!(resume_height(&path, Some(5), 1).unwrap(), 5);
}

#[test]
fn test_status_report_skips_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_log(dir, 800_000, &["image/png", "text/html"]);
    write_log(dir, 800_004, &["image/png"]);
    fs::write(dir.join("800002.json"), "not json").unwrap();
    fs::write(dir.join("summary.json"), "{}").unwrap();

    let report = build_status_report(dir).unwrap();
    assert_eq!(report.blocks_logged, 2);
    assert_eq!(report.latest_block, Some(800_004));
    assert_eq!(report.total_stamps, 3);
    assert_eq!(report.mime_counts.get("image/png"), Some(&2));
    assert_eq!(report.missing_heights, vec![800_001, 800_002, 800_003]);

    let rendered = report.to_string();
    assert!(rendered.contains("Latest block: 800004"));
    assert!(rendered.contains("Blocks logged: 2"));
}

#[test]
fn test_status_report_without_logs() {
    let temp_dir = TempDir::new().unwrap();
    let report = build_status_report(&temp_dir.path().join("absent")).unwrap();
    assert_eq!(report.latest_block, None);
    assert_eq!(report.blocks_logged, 0);
    assert!(report.to_string().contains("Latest block: none"));
}
