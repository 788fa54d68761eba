use crate::types::counterparty::SUBASSET_ACTIVATION_HEIGHT;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
    pub scan: ScanConfig,
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Artifacts named `<txid>.<ext>`
    pub output_dir: PathBuf,
    /// Symlinks named by asset id
    pub alias_dir: PathBuf,
    /// Per-block JSON logs named `<height>.json`
    pub log_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub checkpoint_file: PathBuf,
    pub registry_db: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./stamps/files"),
            alias_dir: PathBuf::from("./stamps/assets"),
            log_dir: PathBuf::from("./stamps/blocks"),
            cache_dir: PathBuf::from("./stamps/cache"),
            checkpoint_file: PathBuf::from("./stamps/checkpoint.json"),
            registry_db: PathBuf::from("./stamps/src721.db"),
        }
    }
}

/// Esplora-compatible block source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockstream.info/api".to_string(),
            timeout_seconds: 30,
            max_retries: 5,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Used when no checkpoint exists
    pub start_height: u32,
    pub poll_interval_seconds: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_height: 779_652,
            poll_interval_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub subasset_activation_height: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            subasset_activation_height: SUBASSET_ACTIVATION_HEIGHT,
        }
    }
}

fn path_default(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    ///
    /// Environment variables take precedence over file configuration, e.g.
    /// `STAMPS_FETCH__BASE_URL` overrides `fetch.base_url`.
    pub fn load() -> Result<Self, ConfigError> {
        let paths = PathsConfig::default();
        let fetch = FetchConfig::default();
        let scan = ScanConfig::default();
        let decoder = DecoderConfig::default();

        let config = Config::builder()
            .set_default("paths.output_dir", path_default(&paths.output_dir))?
            .set_default("paths.alias_dir", path_default(&paths.alias_dir))?
            .set_default("paths.log_dir", path_default(&paths.log_dir))?
            .set_default("paths.cache_dir", path_default(&paths.cache_dir))?
            .set_default("paths.checkpoint_file", path_default(&paths.checkpoint_file))?
            .set_default("paths.registry_db", path_default(&paths.registry_db))?
            .set_default("fetch.base_url", fetch.base_url)?
            .set_default("fetch.timeout_seconds", fetch.timeout_seconds)?
            .set_default("fetch.max_retries", fetch.max_retries as i64)?
            .set_default("fetch.initial_backoff_ms", fetch.initial_backoff_ms)?
            .set_default("fetch.backoff_multiplier", fetch.backoff_multiplier)?
            .set_default("fetch.max_backoff_seconds", fetch.max_backoff_seconds)?
            .set_default("scan.start_height", scan.start_height as i64)?
            .set_default("scan.poll_interval_seconds", scan.poll_interval_seconds)?
            .set_default(
                "decoder.subasset_activation_height",
                decoder.subasset_activation_height as i64,
            )?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("STAMPS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Loaded configuration, or built-in defaults if loading fails
    pub fn get_defaults() -> Self {
        Self::load().unwrap_or_default()
    }
}
