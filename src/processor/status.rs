//! Summary of the per-block logs written by the scanner

use super::block::BlockLog;
use crate::errors::AppResult;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub blocks_logged: usize,
    pub latest_block: Option<u32>,
    pub total_stamps: usize,
    pub total_failures: usize,
    pub mime_counts: BTreeMap<String, usize>,
    /// Heights between the lowest and highest log with no log file
    pub missing_heights: Vec<u32>,
}

/// Read every `<height>.json` under `log_dir`
///
/// Files whose stem is not a height are ignored; logs that do not parse are
/// skipped with a warning.
pub fn build_status_report(log_dir: &Path) -> AppResult<StatusReport> {
    let mut report = StatusReport::default();
    if !log_dir.exists() {
        return Ok(report);
    }

    let pattern = log_dir.join("*.json");
    let mut heights = BTreeSet::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        let Some(height) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u32>().ok())
        else {
            continue;
        };

        let log: BlockLog = match serde_json::from_str(&fs::read_to_string(&path)?) {
            Ok(log) => log,
            Err(e) => {
                warn!("Skipping unreadable block log {}: {}", path.display(), e);
                continue;
            }
        };

        heights.insert(height);
        report.total_stamps += log.stamps.len();
        report.total_failures += log.failures.len();
        for stamp in &log.stamps {
            *report.mime_counts.entry(stamp.mime.clone()).or_insert(0) += 1;
        }
    }

    report.blocks_logged = heights.len();
    report.latest_block = heights.last().copied();
    if let (Some(&low), Some(&high)) = (heights.first(), heights.last()) {
        report.missing_heights = (low..=high).filter(|h| !heights.contains(h)).collect();
    }
    Ok(report)
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Stamp Scan Status ===")?;
        match self.latest_block {
            Some(height) => writeln!(f, "  Latest block: {}", height)?,
            None => writeln!(f, "  Latest block: none")?,
        }
        writeln!(f, "  Blocks logged: {}", self.blocks_logged)?;
        writeln!(f, "  Total stamps: {}", self.total_stamps)?;
        writeln!(f, "  Undecodable: {}", self.total_failures)?;

        if !self.mime_counts.is_empty() {
            writeln!(f, "  By MIME type:")?;
            for (mime, count) in &self.mime_counts {
                writeln!(f, "    {:<24} {:>8}", mime, count)?;
            }
        }

        if self.missing_heights.is_empty() {
            writeln!(f, "  Missing heights: none")?;
        } else {
            let shown: Vec<String> = self
                .missing_heights
                .iter()
                .take(20)
                .map(u32::to_string)
                .collect();
            let more = self.missing_heights.len().saturating_sub(shown.len());
            write!(
                f,
                "  Missing heights ({}): {}",
                self.missing_heights.len(),
                shown.join(", ")
            )?;
            if more > 0 {
                write!(f, " ... (+{} more)", more)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
