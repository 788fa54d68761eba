use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Last fully processed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub last_height: u32,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(last_height: u32) -> Self {
        Self {
            last_height,
            updated_at: Utc::now(),
        }
    }

    /// Read the checkpoint at `path`, `None` if there is none yet
    pub fn load(path: &Path) -> AppResult<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| AppError::Checkpoint(format!("{}: {}", path.display(), e)))
    }

    /// Replace the checkpoint file atomically
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn next_height(&self) -> u32 {
        self.last_height.saturating_add(1)
    }
}

/// Height to scan next: an explicit start wins, then the checkpoint, then
/// `default_start`
pub fn resume_height(path: &Path, explicit_start: Option<u32>, default_start: u32) -> AppResult<u32> {
    if let Some(start) = explicit_start {
        return Ok(start);
    }
    match Checkpoint::load(path)? {
        Some(checkpoint) => {
            info!(
                "Resuming after block {} (checkpoint {})",
                checkpoint.last_height, checkpoint.updated_at
            );
            Ok(checkpoint.next_height())
        }
        None => {
            info!("No checkpoint found, starting at {}", default_start);
            Ok(default_start)
        }
    }
}
