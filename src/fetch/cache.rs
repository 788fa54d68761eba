use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// On-disk cache of raw blocks, one `<hash>.bin` file per block
///
/// Blocks are immutable once buried, so entries are never invalidated.
#[derive(Debug)]
pub struct BlockCache {
    dir: PathBuf,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BlockCache {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", hash))
    }

    /// Raw block bytes for `hash`; unreadable entries count as misses
    pub fn get(&self, hash: &str) -> Option<Vec<u8>> {
        match fs::read(self.entry_path(hash)) {
            Ok(bytes) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for block: {}", hash);
                Some(bytes)
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Unreadable cache entry for {}: {}", hash, e);
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for block: {}", hash);
                None
            }
        }
    }

    /// Store a block, writing to a temporary file first so readers never
    /// see a partial entry
    pub fn put(&self, hash: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.entry_path(hash);
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!("Cached block: {} ({} bytes)", hash, bytes.len());
        Ok(())
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache performance statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests() == 0 {
            0.0
        } else {
            (self.hits as f64 / self.total_requests() as f64) * 100.0
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}
