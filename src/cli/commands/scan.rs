use crate::config::AppConfig;
use crate::decoder::{ArtifactStore, StampDecoder};
use crate::errors::AppResult;
use crate::fetch::{BlockCache, BlockClient};
use crate::processor::{resume_height, BlockProcessor, Scanner};
use crate::registry::SqliteRegistry;
use clap::Args;
use std::time::Duration;
use tracing::info;

/// Follow the chain and extract every stamp
#[derive(Args)]
pub struct ScanCommand {
    /// First height to scan (default: resume from checkpoint)
    #[arg(long)]
    pub start: Option<u32>,

    /// Last height to scan; without it the scan follows the tip
    #[arg(long)]
    pub end: Option<u32>,

    /// Esplora API base URL (overrides config.toml)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seconds to wait before polling again at the tip
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Do not cache raw blocks on disk
    #[arg(long)]
    pub no_cache: bool,
}

impl ScanCommand {
    pub async fn run(&self) -> AppResult<()> {
        let mut config = AppConfig::load()?;
        if let Some(base_url) = &self.base_url {
            config.fetch.base_url = base_url.clone();
        }

        let mut client = BlockClient::new(&config.fetch)?;
        if !self.no_cache {
            client = client.with_cache(BlockCache::new(&config.paths.cache_dir)?);
        }

        let registry = SqliteRegistry::open(&config.paths.registry_db)?;
        let store = ArtifactStore::new(&config.paths.output_dir, &config.paths.alias_dir)?;
        let processor = BlockProcessor::new(
            StampDecoder::from_config(&config.decoder),
            registry,
            store,
            &config.paths.log_dir,
        )?;

        let start = resume_height(
            &config.paths.checkpoint_file,
            self.start,
            config.scan.start_height,
        )?;
        let poll_interval = Duration::from_secs(
            self.poll_interval
                .unwrap_or(config.scan.poll_interval_seconds),
        );
        info!(
            "Artifacts: {} | Logs: {}",
            config.paths.output_dir.display(),
            config.paths.log_dir.display()
        );

        let mut scanner = Scanner::new(client, processor, &config.paths.checkpoint_file, poll_interval);
        scanner.run(start, self.end).await?;
        Ok(())
    }
}
