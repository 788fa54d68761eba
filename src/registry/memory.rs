use super::{ArtifactSource, CollectionRegistry};
use crate::errors::RegistryResult;
use crate::types::stamps::Src721Collection;
use std::collections::HashMap;

/// Registry and artifact source held entirely in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    collections: HashMap<String, Src721Collection>,
    artifacts: HashMap<String, Vec<u8>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bytes` loadable as the artifact of `asset_id`
    pub fn insert_artifact(&mut self, asset_id: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.artifacts.insert(asset_id.into(), bytes.into());
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }
}

impl CollectionRegistry for InMemoryRegistry {
    fn put_collection(
        &mut self,
        asset_id: &str,
        descriptor: &Src721Collection,
    ) -> RegistryResult<()> {
        self.collections
            .insert(asset_id.to_string(), descriptor.clone());
        Ok(())
    }

    fn get_collection(&self, asset_id: &str) -> RegistryResult<Option<Src721Collection>> {
        Ok(self.collections.get(asset_id).cloned())
    }
}

impl ArtifactSource for InMemoryRegistry {
    fn load_artifact(&self, asset_id: &str) -> RegistryResult<Option<Vec<u8>>> {
        Ok(self.artifacts.get(asset_id).cloned())
    }
}
