use super::cache::{BlockCache, CacheStats};
use super::retry::{with_retries, RetryPolicy};
use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use bitcoin::{Block, BlockHash, Transaction, Txid};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Confirmation state reported by `/tx/{txid}/status`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxStatus {
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u32>,
}

/// Async client for an Esplora-compatible REST API
pub struct BlockClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    cache: Option<BlockCache>,
}

impl BlockClient {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::ConnectionFailed(format!("HTTP client setup: {}", e)))?;

        info!("Block source: {}", config.base_url);
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy::from(config),
            cache: None,
        })
    }

    /// Serve raw blocks from `cache` when possible
    pub fn with_cache(mut self, cache: BlockCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(BlockCache::get_stats)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> FetchResult<reqwest::Response> {
        let url = self.url(path);
        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_seconds: self.policy.timeout_seconds,
                    operation: path.to_string(),
                }
            } else {
                FetchError::ConnectionFailed(format!("{}: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                what: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    async fn get_text(&self, path: &str) -> FetchResult<String> {
        with_retries(&self.policy, path, move || async move {
            self.get(path)
                .await?
                .text()
                .await
                .map_err(|e| FetchError::InvalidResponse(format!("{}: {}", path, e)))
        })
        .await
    }

    async fn get_bytes(&self, path: &str) -> FetchResult<Vec<u8>> {
        with_retries(&self.policy, path, move || async move {
            let bytes = self
                .get(path)
                .await?
                .bytes()
                .await
                .map_err(|e| FetchError::InvalidResponse(format!("{}: {}", path, e)))?;
            Ok(bytes.to_vec())
        })
        .await
    }

    /// Height of the current chain tip
    pub async fn tip_height(&self) -> FetchResult<u32> {
        let text = self.get_text("/blocks/tip/height").await?;
        text.trim()
            .parse()
            .map_err(|_| FetchError::InvalidResponse(format!("tip height '{}'", text.trim())))
    }

    /// Hash of the block at `height`; `NotFound` past the tip
    pub async fn block_hash(&self, height: u32) -> FetchResult<BlockHash> {
        let text = self.get_text(&format!("/block-height/{}", height)).await?;
        BlockHash::from_str(text.trim())
            .map_err(|e| FetchError::InvalidResponse(format!("block hash '{}': {}", text.trim(), e)))
    }

    /// Serialized block bytes, from the cache when present
    pub async fn raw_block(&self, hash: &BlockHash) -> FetchResult<Vec<u8>> {
        let key = hash.to_string();
        if let Some(bytes) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            return Ok(bytes);
        }

        let bytes = self.get_bytes(&format!("/block/{}/raw", key)).await?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &bytes) {
                debug!("Could not cache block {}: {}", key, e);
            }
        }
        Ok(bytes)
    }

    /// Fetch and decode a single transaction
    pub async fn transaction(&self, txid: &Txid) -> FetchResult<Transaction> {
        let text = self.get_text(&tx_path(txid, "hex")).await?;
        parse_transaction_hex(&text)
    }

    /// Confirmation status of a transaction; `block_height` is unset while
    /// it is in the mempool
    pub async fn tx_status(&self, txid: &Txid) -> FetchResult<TxStatus> {
        let text = self.get_text(&tx_path(txid, "status")).await?;
        parse_tx_status(&text)
    }

    /// Fetch and parse the block at `height`
    pub async fn block_at(&self, height: u32) -> FetchResult<(BlockHash, Block)> {
        let hash = self.block_hash(height).await?;
        let bytes = self.raw_block(&hash).await?;
        let block = parse_block(&bytes)?;
        if block.block_hash() != hash {
            return Err(FetchError::InvalidResponse(format!(
                "block {} hashed to {}",
                hash,
                block.block_hash()
            )));
        }
        Ok((hash, block))
    }
}

fn tx_path(txid: &Txid, resource: &str) -> String {
    format!("/tx/{}/{}", txid, resource)
}

/// Decode the hex body of `/tx/{txid}/hex`
pub fn parse_transaction_hex(text: &str) -> FetchResult<Transaction> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| FetchError::InvalidResponse(format!("transaction hex: {}", e)))?;
    bitcoin::consensus::deserialize(&bytes)
        .map_err(|e| FetchError::InvalidResponse(format!("transaction decode: {}", e)))
}

pub fn parse_tx_status(text: &str) -> FetchResult<TxStatus> {
    serde_json::from_str(text)
        .map_err(|e| FetchError::InvalidResponse(format!("transaction status: {}", e)))
}

/// Consensus-decode a raw block
pub fn parse_block(bytes: &[u8]) -> FetchResult<Block> {
    bitcoin::consensus::deserialize(bytes)
        .map_err(|e| FetchError::InvalidResponse(format!("block decode: {}", e)))
}
