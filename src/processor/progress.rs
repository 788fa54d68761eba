use std::time::Instant;
use tracing::info;

/// Throttled progress reporting for the block scanner
pub struct ScanProgress {
    start_time: Instant,
    last_report: Instant,
    report_interval_ms: u128,
    pub blocks: usize,
    pub stamps: usize,
    pub failures: usize,
    /// Chain tip as last seen by the scanner
    pub tip_height: Option<u32>,
}

impl Default for ScanProgress {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report: now,
            report_interval_ms: 10_000,
            blocks: 0,
            stamps: 0,
            failures: 0,
            tip_height: None,
        }
    }
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_block(&mut self, stamps: usize, failures: usize) {
        self.blocks += 1;
        self.stamps += stamps;
        self.failures += failures;
    }

    /// True at most once per report interval
    pub fn should_report(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_report).as_millis() > self.report_interval_ms {
            self.last_report = now;
            true
        } else {
            false
        }
    }

    /// Blocks after `height` up to the known tip
    pub fn blocks_remaining(&self, height: u32) -> Option<u32> {
        self.tip_height.map(|tip| tip.saturating_sub(height))
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn report(&self, height: u32) {
        let elapsed = self.elapsed_seconds();
        let rate = if elapsed > 0.0 {
            self.blocks as f64 / elapsed
        } else {
            0.0
        };
        let remaining = self
            .blocks_remaining(height)
            .map(|n| format!(" | Remaining: {}", n))
            .unwrap_or_default();
        info!(
            "Height {}{} | Blocks: {} | Stamps: {} | Failures: {} | Rate: {:.2} blocks/sec | Elapsed: {}",
            height,
            remaining,
            self.blocks,
            self.stamps,
            self.failures,
            rate,
            format_elapsed_time(elapsed)
        );
    }

    pub fn report_completion(&self) {
        info!("=== Scan Completed ===");
        info!("  Blocks processed: {}", self.blocks);
        info!("  Stamps found: {}", self.stamps);
        info!("  Undecodable: {}", self.failures);
        info!("  Time elapsed: {}", format_elapsed_time(self.elapsed_seconds()));
    }
}

/// Human-readable duration: `45.2s`, `1m 30s (90.0s)`, `1h 0m 0s (3600.0s)`, ...
pub fn format_elapsed_time(elapsed_secs: f64) -> String {
    if elapsed_secs < 60.0 {
        return format!("{:.1}s", elapsed_secs);
    }

    let days = (elapsed_secs / 86400.0).floor();
    let hours = ((elapsed_secs % 86400.0) / 3600.0).floor();
    let minutes = ((elapsed_secs % 3600.0) / 60.0).floor();
    let seconds = elapsed_secs % 60.0;

    if elapsed_secs < 3600.0 {
        format!("{}m {:.0}s ({:.1}s)", minutes, seconds, elapsed_secs)
    } else if elapsed_secs < 86400.0 {
        format!(
            "{}h {}m {:.0}s ({:.1}s)",
            hours, minutes, seconds, elapsed_secs
        )
    } else {
        format!(
            "{}d {}h {}m {:.0}s ({:.1}s)",
            days, hours, minutes, seconds, elapsed_secs
        )
    }
}
