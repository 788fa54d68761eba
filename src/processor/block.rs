use crate::decoder::{ArtifactStore, StampDecoder};
use crate::errors::AppResult;
use crate::registry::CollectionRegistry;
use crate::types::DecodedTransaction;
use bitcoin::Block;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-block log written to `<log_dir>/<height>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLog {
    pub height: u32,
    pub hash: String,
    pub stamps: Vec<StampLogEntry>,
    pub failures: Vec<FailureLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampLogEntry {
    pub tx: String,
    pub asset: String,
    pub mime: String,
    pub file: String,
}

/// A transaction that carried a recognised but undecodable stamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureLogEntry {
    pub tx: String,
    pub error: String,
}

/// Decodes blocks in transaction order, persisting every artifact
///
/// Owns the SRC-721 registry so deploys are always committed before the
/// mints that follow them in the chain.
pub struct BlockProcessor<R: CollectionRegistry> {
    decoder: StampDecoder,
    registry: R,
    store: ArtifactStore,
    log_dir: PathBuf,
}

impl<R: CollectionRegistry> BlockProcessor<R> {
    pub fn new(
        decoder: StampDecoder,
        registry: R,
        store: ArtifactStore,
        log_dir: impl Into<PathBuf>,
    ) -> AppResult<Self> {
        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir)?;
        Ok(Self {
            decoder,
            registry,
            store,
            log_dir,
        })
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn log_path(&self, height: u32) -> PathBuf {
        self.log_dir.join(format!("{}.json", height))
    }

    /// Decode and persist every stamp in `block`
    pub fn process_block(&mut self, height: u32, block: &Block) -> AppResult<BlockLog> {
        let transactions: Vec<DecodedTransaction> = block
            .txdata
            .iter()
            .map(|tx| DecodedTransaction::from_bitcoin(tx, height))
            .collect();
        self.process_transactions(height, &block.block_hash().to_string(), &transactions)
    }

    /// Decode `transactions` in order and write the block log
    ///
    /// Undecodable transactions are logged as failures; artifact or log I/O
    /// errors abort the block.
    pub fn process_transactions(
        &mut self,
        height: u32,
        hash: &str,
        transactions: &[DecodedTransaction],
    ) -> AppResult<BlockLog> {
        let mut log = BlockLog {
            height,
            hash: hash.to_string(),
            stamps: Vec::new(),
            failures: Vec::new(),
        };

        for tx in transactions {
            let record = match self.decoder.decode(tx, &mut self.registry, &self.store) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Undecodable stamp in {}: {}", tx.txid, e);
                    log.failures.push(FailureLogEntry {
                        tx: tx.txid.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let artifact = match record.artifact() {
                Ok(Some(artifact)) => artifact,
                Ok(None) => {
                    debug!("{}: issuance without content", tx.txid);
                    continue;
                }
                Err(e) => {
                    log.failures.push(FailureLogEntry {
                        tx: tx.txid.clone(),
                        error: format!("payload encoding: {}", e),
                    });
                    continue;
                }
            };

            let path = self.store.persist(&tx.txid, record.asset_id(), &artifact)?;
            log.stamps.push(StampLogEntry {
                tx: tx.txid.clone(),
                asset: record.asset_id().to_string(),
                mime: artifact.mime.mime_type().to_string(),
                file: file_name(&path),
            });
        }

        self.write_log(&log)?;
        if !log.stamps.is_empty() || !log.failures.is_empty() {
            info!(
                "Block {}: {} stamps, {} failures",
                height,
                log.stamps.len(),
                log.failures.len()
            );
        }
        Ok(log)
    }

    fn write_log(&self, log: &BlockLog) -> AppResult<()> {
        let path = self.log_path(log.height);
        fs::write(&path, serde_json::to_string_pretty(log)?)?;
        debug!("Wrote block log {}", path.display());
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
