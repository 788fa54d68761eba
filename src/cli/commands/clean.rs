use crate::config::{AppConfig, PathsConfig};
use crate::errors::AppResult;
use clap::Args;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Delete scan output so the next scan starts from the configured height
#[derive(Args)]
pub struct CleanCommand {
    /// Also delete the raw block cache
    #[arg(long)]
    pub cache: bool,

    /// Also delete the SRC-721 collection registry
    #[arg(long)]
    pub registry: bool,
}

impl CleanCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::load()?;
        let removed = remove_paths(&clean_targets(&config.paths, self.cache, self.registry))?;
        if removed.is_empty() {
            println!("Nothing to clean");
        }
        for path in removed {
            println!("Deleted {}", path.display());
        }
        Ok(())
    }
}

/// Artifacts, aliases, block logs and the checkpoint, plus the optional extras
pub fn clean_targets(paths: &PathsConfig, cache: bool, registry: bool) -> Vec<&Path> {
    let mut targets = vec![
        paths.output_dir.as_path(),
        paths.alias_dir.as_path(),
        paths.log_dir.as_path(),
        paths.checkpoint_file.as_path(),
    ];
    if cache {
        targets.push(paths.cache_dir.as_path());
    }
    if registry {
        targets.push(paths.registry_db.as_path());
    }
    targets
}

/// Remove each path that exists, returning the ones removed
pub fn remove_paths(targets: &[&Path]) -> AppResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for &path in targets {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        info!("Deleted {}", path.display());
        removed.push(path.to_path_buf());
    }
    Ok(removed)
}
