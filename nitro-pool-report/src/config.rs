//! Runtime configuration loaded from `nitro-pool.toml` and CLI flags.
//!
//! Every field is optional. Missing values fall back to the selected
//! network's defaults from [`nitro_pool::networks`]; CLI flags override the
//! file.
//!
//! ```toml
//! chain_id = 42161
//! pool = "0x93b9965cdc531a2659d0982c83d2f56Dc01B9fBE"
//! start_block = 39952704
//! chunk_size = 50000
//! rpcs = ["https://arb1.arbitrum.io/rpc"]
//!
//! [explorer]
//! api_key = "..."
//! abi_dir = "abis"
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result, bail};
use nitro_pool::abi::ExplorerAbiSource;
use nitro_pool::networks::Network;
use nitro_pool::scan::{DEFAULT_CHUNK_SIZE, ScanConfig};
use serde::Deserialize;

/// Default per-request RPC timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    /// EIP-155 chain ID (default: Arbitrum One).
    pub chain_id: Option<u64>,
    /// NitroPool contract to report on.
    pub pool: Option<Address>,
    /// First block to scan.
    pub start_block: Option<u64>,
    /// Blocks per `eth_getLogs` request.
    pub chunk_size: Option<u64>,
    /// Ordered RPC URLs (best first).
    #[serde(default)]
    pub rpcs: Vec<String>,
    /// Per-request timeout before falling back to the next RPC.
    pub request_timeout_secs: Option<u64>,
    /// Block explorer used to fetch contract ABIs.
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// `[explorer]` table.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExplorerConfig {
    /// Etherscan-compatible API endpoint.
    pub url: Option<String>,
    /// API key sent as `apikey`.
    pub api_key: Option<String>,
    /// Directory caching fetched ABIs.
    pub abi_dir: Option<PathBuf>,
}

/// Values given on the command line; `Some` wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--chain`.
    pub chain_id: Option<u64>,
    /// `--pool`.
    pub pool: Option<Address>,
    /// `--start-block`.
    pub start_block: Option<u64>,
    /// `--chunk-size`.
    pub chunk_size: Option<u64>,
    /// `--rpc` (repeatable); replaces the file's list when non-empty.
    pub rpcs: Vec<String>,
    /// `--api-key` / `NITRO_EXPLORER_API_KEY`.
    pub api_key: Option<String>,
    /// `--abi-dir`.
    pub abi_dir: Option<PathBuf>,
}

/// Fully resolved settings for one report run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// EIP-155 chain ID.
    pub chain_id: u64,
    /// NitroPool contract.
    pub pool: Address,
    /// Scan start and chunk size.
    pub scan: ScanConfig,
    /// RPC endpoints in fallback order (never empty).
    pub rpcs: Vec<String>,
    /// Per-request RPC timeout.
    pub request_timeout: Duration,
    /// Explorer API endpoint.
    pub explorer_url: String,
    /// Explorer API key.
    pub api_key: Option<String>,
    /// ABI cache directory.
    pub abi_dir: Option<PathBuf>,
}

impl Config {
    /// Read `nitro-pool.toml` (or whatever `--config` names).
    ///
    /// An absent file is not an error: every setting then comes from the
    /// CLI and the network presets.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or is not valid TOML for
    /// [`Config`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.chain_id = overrides.chain_id.or(self.chain_id);
        self.pool = overrides.pool.or(self.pool);
        self.start_block = overrides.start_block.or(self.start_block);
        self.chunk_size = overrides.chunk_size.or(self.chunk_size);
        if !overrides.rpcs.is_empty() {
            self.rpcs = overrides.rpcs;
        }
        self.explorer.api_key = overrides.api_key.or(self.explorer.api_key);
        self.explorer.abi_dir = overrides.abi_dir.or(self.explorer.abi_dir);
        self
    }

    /// Fill defaults from the network and validate.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero chunk size, an unknown chain without
    /// RPCs, or a missing pool on a network without a preset.
    pub fn resolve(self) -> Result<RunConfig> {
        let chain_id = self
            .chain_id
            .unwrap_or_else(|| Network::default().chain_id());
        let network = Network::from_chain_id(chain_id);

        let rpcs = if self.rpcs.is_empty() {
            let Some(network) = network else {
                bail!("chain {chain_id} has no default RPC; configure `rpcs`");
            };
            network.default_rpcs().iter().map(|s| (*s).to_owned()).collect()
        } else {
            self.rpcs
        };

        let preset = network.and_then(Network::default_pool);
        let Some(pool) = self.pool.or_else(|| preset.map(|p| p.pool)) else {
            bail!("no pool configured for chain {chain_id}; set `pool`");
        };
        let start_block = self.start_block.unwrap_or_else(|| {
            preset
                .filter(|p| p.pool == pool)
                .map_or(0, |p| p.start_block)
        });

        let scan = ScanConfig::new(start_block, self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE))?;

        Ok(RunConfig {
            chain_id,
            pool,
            scan,
            rpcs,
            request_timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            explorer_url: self
                .explorer
                .url
                .unwrap_or_else(|| ExplorerAbiSource::DEFAULT_URL.to_owned()),
            api_key: self.explorer.api_key,
            abi_dir: self.explorer.abi_dir,
        })
    }
}
