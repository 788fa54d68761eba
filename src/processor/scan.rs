use super::block::BlockProcessor;
use super::checkpoint::Checkpoint;
use super::progress::ScanProgress;
use crate::errors::{AppResult, FetchError};
use crate::fetch::BlockClient;
use crate::registry::CollectionRegistry;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Follows the chain block by block, checkpointing after each one
pub struct Scanner<R: CollectionRegistry> {
    client: BlockClient,
    processor: BlockProcessor<R>,
    checkpoint_file: PathBuf,
    poll_interval: Duration,
}

impl<R: CollectionRegistry> Scanner<R> {
    pub fn new(
        client: BlockClient,
        processor: BlockProcessor<R>,
        checkpoint_file: impl Into<PathBuf>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            processor,
            checkpoint_file: checkpoint_file.into(),
            poll_interval,
        }
    }

    /// Scan from `start` through `end` (inclusive), or forever without `end`
    ///
    /// At the tip the scanner sleeps for the poll interval and asks again.
    pub async fn run(&mut self, start: u32, end: Option<u32>) -> AppResult<ScanProgress> {
        let mut progress = ScanProgress::new();
        let mut height = start;
        progress.tip_height = self.fetch_tip().await;
        match progress.blocks_remaining(start) {
            Some(remaining) => info!("Scanning from block {} ({} behind the tip)", start, remaining),
            None => info!("Scanning from block {}", start),
        }

        while end.map_or(true, |end| height <= end) {
            let (_, block) = match self.client.block_at(height).await {
                Ok(found) => found,
                Err(FetchError::NotFound { .. }) => {
                    info!(
                        "Block {} not available yet, polling again in {:?}",
                        height, self.poll_interval
                    );
                    sleep(self.poll_interval).await;
                    if let Some(tip) = self.fetch_tip().await {
                        progress.tip_height = Some(tip);
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let log = self.processor.process_block(height, &block)?;
            Checkpoint::new(height).save(&self.checkpoint_file)?;
            progress.record_block(log.stamps.len(), log.failures.len());
            if progress.should_report() {
                progress.report(height);
            }
            height += 1;
        }

        if let Some(stats) = self.client.cache_stats() {
            info!(
                "Block cache: {} hits, {} misses ({:.1}% hit rate)",
                stats.hits,
                stats.misses,
                stats.hit_rate()
            );
        }
        progress.report_completion();
        Ok(progress)
    }

    /// Current tip, or `None` if the source cannot say; only used for reporting
    async fn fetch_tip(&self) -> Option<u32> {
        match self.client.tip_height().await {
            Ok(tip) => Some(tip),
            Err(e) => {
                debug!("Tip height unavailable: {}", e);
                None
            }
        }
    }
}
