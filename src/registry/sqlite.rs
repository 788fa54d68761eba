//! SQLite-backed SRC-721 collection registry

use super::CollectionRegistry;
use crate::errors::RegistryResult;
use crate::types::stamps::Src721Collection;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r#"
    PRAGMA user_version = 1;

    CREATE TABLE IF NOT EXISTS src721_collections (
        asset_id TEXT PRIMARY KEY,
        descriptor_json TEXT NOT NULL,
        updated_at INTEGER DEFAULT (strftime('%s', 'now'))
    );
"#;

/// Collection descriptors persisted as JSON rows
pub struct SqliteRegistry {
    connection: Connection,
}

impl SqliteRegistry {
    /// Open (creating if needed) the registry database at `path`
    pub fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let connection = Connection::open(path)?;
        connection.execute_batch(SCHEMA)?;
        info!("SRC-721 registry opened: {}", path.display());
        Ok(Self { connection })
    }

    /// Registry that lives only as long as this value
    pub fn in_memory() -> RegistryResult<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection })
    }

    pub fn collection_count(&self) -> RegistryResult<u64> {
        let count: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM src721_collections",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl CollectionRegistry for SqliteRegistry {
    fn put_collection(
        &mut self,
        asset_id: &str,
        descriptor: &Src721Collection,
    ) -> RegistryResult<()> {
        let json = serde_json::to_string(descriptor)?;
        self.connection.execute(
            "INSERT INTO src721_collections (asset_id, descriptor_json)
             VALUES (?1, ?2)
             ON CONFLICT(asset_id) DO UPDATE SET
                descriptor_json = excluded.descriptor_json,
                updated_at = strftime('%s', 'now')",
            params![asset_id, json],
        )?;
        debug!("Stored SRC-721 collection {}", asset_id);
        Ok(())
    }

    fn get_collection(&self, asset_id: &str) -> RegistryResult<Option<Src721Collection>> {
        let json: Option<String> = self
            .connection
            .query_row(
                "SELECT descriptor_json FROM src721_collections WHERE asset_id = ?1",
                params![asset_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
