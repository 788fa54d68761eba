//! Artifact persistence
//!
//! Every stamp artifact is written once, named by txid, and reachable by
//! asset id through a symlink:
//!
//! ```text
//! <output_dir>/<txid>.<ext>
//! <alias_dir>/<assetId> -> <output_dir>/<txid>.<ext>
//! ```

use crate::errors::RegistryResult;
use crate::registry::ArtifactSource;
use crate::types::stamps::Artifact;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes artifacts and their asset-id aliases
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
    alias_dir: PathBuf,
}

impl ArtifactStore {
    /// Create the store, creating both directories if needed
    pub fn new(output_dir: impl Into<PathBuf>, alias_dir: impl Into<PathBuf>) -> RegistryResult<Self> {
        let store = Self {
            output_dir: output_dir.into(),
            alias_dir: alias_dir.into(),
        };
        fs::create_dir_all(&store.output_dir)?;
        fs::create_dir_all(&store.alias_dir)?;
        Ok(store)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn alias_path(&self, asset_id: &str) -> PathBuf {
        self.alias_dir.join(asset_id)
    }

    /// Write `artifact` for `txid` and point the `asset_id` alias at it
    ///
    /// Returns the path of the written file.
    pub fn persist(&self, txid: &str, asset_id: &str, artifact: &Artifact) -> RegistryResult<PathBuf> {
        let file_path = self
            .output_dir
            .join(format!("{}.{}", txid, artifact.extension()));
        fs::write(&file_path, &artifact.bytes)?;
        debug!(
            "Wrote {} ({} bytes)",
            file_path.display(),
            artifact.bytes.len()
        );

        self.link_alias(asset_id, &file_path)?;
        Ok(file_path)
    }

    fn link_alias(&self, asset_id: &str, target: &Path) -> RegistryResult<()> {
        let alias = self.alias_path(asset_id);
        match fs::symlink_metadata(&alias) {
            Ok(_) => {
                debug!("Replacing alias {}", alias.display());
                fs::remove_file(&alias)?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let target = fs::canonicalize(target)?;
        std::os::unix::fs::symlink(&target, &alias)?;
        Ok(())
    }
}

impl ArtifactSource for ArtifactStore {
    fn load_artifact(&self, asset_id: &str) -> RegistryResult<Option<Vec<u8>>> {
        match fs::read(self.alias_path(asset_id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No stored artifact for {}", asset_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
