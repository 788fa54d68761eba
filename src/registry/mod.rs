//! SRC-721 collaborators
//!
//! The decoder never owns cross-transaction state. SRC-721 deploys write a
//! collection descriptor through [`CollectionRegistry`] and mints read it
//! back; deploys inline previously stored trait images through
//! [`ArtifactSource`]. Callers process transactions in chain order so every
//! deploy is committed before its mints are decoded.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRegistry;
pub use sqlite::SqliteRegistry;

use crate::errors::RegistryResult;
use crate::types::stamps::Src721Collection;

/// Read/write store of SRC-721 collection descriptors keyed by asset id
pub trait CollectionRegistry {
    /// Store (or replace) the descriptor for `asset_id`
    fn put_collection(&mut self, asset_id: &str, descriptor: &Src721Collection)
        -> RegistryResult<()>;

    fn get_collection(&self, asset_id: &str) -> RegistryResult<Option<Src721Collection>>;
}

/// Read access to previously persisted stamp artifacts
pub trait ArtifactSource {
    /// Artifact bytes for `asset_id`, `None` when nothing was stored
    fn load_artifact(&self, asset_id: &str) -> RegistryResult<Option<Vec<u8>>>;
}
