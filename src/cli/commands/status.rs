use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::processor::{build_status_report, Checkpoint};
use clap::Args;
use std::path::PathBuf;

/// Summarise the block logs and checkpoint
#[derive(Args)]
pub struct StatusCommand {
    /// Block log directory (overrides config.toml)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl StatusCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::load()?;
        let log_dir = self.log_dir.clone().unwrap_or(config.paths.log_dir);

        let report = build_status_report(&log_dir)?;
        print!("{}", report);
        match Checkpoint::load(&config.paths.checkpoint_file)? {
            Some(checkpoint) => println!(
                "  Checkpoint: block {} at {}",
                checkpoint.last_height, checkpoint.updated_at
            ),
            None => println!("  Checkpoint: none"),
        }
        Ok(())
    }
}
