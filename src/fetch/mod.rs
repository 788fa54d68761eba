//! Block source
//!
//! - **Client** - async Esplora REST client (`reqwest`) with retries
//! - **Cache** - raw block cache on disk
//! - **Retry** - exponential backoff and per-request timeout

pub mod cache;
pub mod client;
pub mod retry;

pub use cache::{BlockCache, CacheStats};
pub use client::{parse_block, parse_transaction_hex, parse_tx_status, BlockClient, TxStatus};
pub use retry::{calculate_next_backoff, with_retries, RetryPolicy};
