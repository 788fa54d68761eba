use crate::config::AppConfig;
use crate::decoder::{ArtifactStore, StampDecoder};
use crate::errors::{AppError, AppResult};
use crate::fetch::BlockClient;
use crate::registry::SqliteRegistry;
use crate::types::DecodedTransaction;
use bitcoin::{Transaction, Txid};
use clap::{ArgGroup, Args};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Decode a single transaction and print the stamp record as JSON
#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "raw", "txid"])))]
pub struct DecodeCommand {
    /// Transaction as JSON (txid, blockHeight, inputs, outputs)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Raw transaction hex (requires --height)
    #[arg(long, requires = "height")]
    pub raw: Option<String>,

    /// Fetch the transaction from the Esplora API
    #[arg(long)]
    pub txid: Option<String>,

    /// Esplora API base URL for --txid (overrides config.toml)
    #[arg(long, requires = "txid")]
    pub base_url: Option<String>,

    /// Block height (overrides the file's blockHeight or the confirmed height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Persist the artifact and its asset alias
    #[arg(long)]
    pub write: bool,

    /// SRC-721 registry database (overrides config.toml)
    #[arg(long)]
    pub registry_db: Option<PathBuf>,

    /// Artifact directory (overrides config.toml)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl DecodeCommand {
    pub async fn run(&self) -> AppResult<()> {
        let mut config = AppConfig::load()?;
        if let Some(base_url) = &self.base_url {
            config.fetch.base_url = base_url.clone();
        }
        let tx = match &self.txid {
            Some(txid) => self.fetch_transaction(&config, txid).await?,
            None => self.load_transaction()?,
        };
        info!("Decoding {} at height {}", tx.txid, tx.block_height);

        let mut registry = SqliteRegistry::open(
            self.registry_db
                .clone()
                .unwrap_or(config.paths.registry_db),
        )?;
        let store = ArtifactStore::new(
            self.output_dir.clone().unwrap_or(config.paths.output_dir),
            config.paths.alias_dir,
        )?;
        let decoder = StampDecoder::from_config(&config.decoder);

        let Some(record) = decoder.decode(&tx, &mut registry, &store)? else {
            println!("No stamp content in {}", tx.txid);
            return Ok(());
        };
        println!("{}", serde_json::to_string_pretty(&record)?);

        if self.write {
            let artifact = record
                .artifact()
                .map_err(|e| AppError::InvalidData(format!("payload encoding: {}", e)))?;
            match artifact {
                Some(artifact) => {
                    let path = store.persist(&tx.txid, record.asset_id(), &artifact)?;
                    println!("Wrote {}", path.display());
                }
                None => println!("Issuance {} has no artifact to write", record.asset_id()),
            }
        }
        Ok(())
    }

    async fn fetch_transaction(
        &self,
        config: &AppConfig,
        txid: &str,
    ) -> AppResult<DecodedTransaction> {
        let txid = Txid::from_str(txid.trim())
            .map_err(|e| AppError::InvalidData(format!("txid '{}': {}", txid, e)))?;
        let client = BlockClient::new(&config.fetch)?;
        let tx = client.transaction(&txid).await?;

        let height = match self.height {
            Some(height) => height,
            None => {
                let status = client.tx_status(&txid).await?;
                confirmed_height(&txid, status.block_height)?
            }
        };
        Ok(DecodedTransaction::from_bitcoin(&tx, height))
    }

    fn load_transaction(&self) -> AppResult<DecodedTransaction> {
        if let Some(raw) = &self.raw {
            let bytes = hex::decode(raw.trim())
                .map_err(|e| AppError::InvalidData(format!("transaction hex: {}", e)))?;
            let tx: Transaction = bitcoin::consensus::deserialize(&bytes)
                .map_err(|e| AppError::InvalidData(format!("transaction decode: {}", e)))?;
            let height = self
                .height
                .ok_or_else(|| AppError::Config("--raw requires --height".to_string()))?;
            return Ok(DecodedTransaction::from_bitcoin(&tx, height));
        }

        let path = self
            .file
            .as_ref()
            .ok_or_else(|| AppError::Config("one of --file, --raw or --txid is required".to_string()))?;
        let mut tx: DecodedTransaction = serde_json::from_str(&fs::read_to_string(path)?)?;
        if let Some(height) = self.height {
            tx.block_height = height;
        }
        Ok(tx)
    }
}

/// Height a fetched transaction decodes at; mempool transactions need `--height`
fn confirmed_height(txid: &Txid, block_height: Option<u32>) -> AppResult<u32> {
    block_height.ok_or_else(|| {
        AppError::Config(format!("{} is unconfirmed, pass --height to decode it", txid))
    })
}
