//! Contract ABI sources.
//!
//! The pool, its NFT pool and the LP pair are read through ABIs fetched at
//! runtime rather than compiled-in bindings. [`ExplorerAbiSource`] asks an
//! Etherscan-compatible explorer, [`DirAbiSource`] reads a local directory,
//! and [`CachedAbiSource`] combines the two so repeated runs stay offline.

use std::future::Future;
use std::path::{Path, PathBuf};

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Anything able to produce the ABI of a deployed contract.
pub trait AbiSource {
    /// Fetch the ABI of `address`.
    fn fetch_abi(&self, address: Address) -> impl Future<Output = Result<JsonAbi>>;
}

/// Etherscan-compatible `getabi` endpoint.
#[derive(Debug, Clone)]
pub struct ExplorerAbiSource {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    chain_id: u64,
}

/// Envelope returned by every explorer API call.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    result: String,
}

impl ExplorerAbiSource {
    /// Etherscan multichain API (`chainid` selects the network).
    pub const DEFAULT_URL: &str = "https://api.etherscan.io/v2/api";

    /// Create a source querying `url` for contracts on `chain_id`.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: Option<String>, chain_id: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key,
            chain_id,
        }
    }
}

impl AbiSource for ExplorerAbiSource {
    async fn fetch_abi(&self, address: Address) -> Result<JsonAbi> {
        let mut query = vec![
            ("chainid", self.chain_id.to_string()),
            ("module", "contract".to_owned()),
            ("action", "getabi".to_owned()),
            ("address", address.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        tracing::debug!(%address, url = %self.url, "fetching ABI");
        let response: ExplorerResponse = self
            .http
            .get(&self.url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_explorer_response(address, response)
    }
}

fn parse_explorer_response(address: Address, response: ExplorerResponse) -> Result<JsonAbi> {
    if response.status != "1" {
        return Err(Error::Explorer {
            address,
            message: format!("{}: {}", response.message, response.result),
        });
    }
    Ok(serde_json::from_str(&response.result)?)
}

/// ABIs stored as `<dir>/<checksummed address>.json`.
#[derive(Debug, Clone)]
pub struct DirAbiSource {
    dir: PathBuf,
}

impl DirAbiSource {
    /// Read ABIs from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the ABI of `address`.
    #[must_use]
    pub fn path_for(&self, address: Address) -> PathBuf {
        self.dir.join(format!("{}.json", address.to_checksum(None)))
    }

    fn read(&self, address: Address) -> Result<JsonAbi> {
        let path = self.path_for(address);
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist `abi` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn store(&self, address: Address, abi: &JsonAbi) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let path = self.path_for(address);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(abi)?).map_err(|e| Error::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Error::io(&path, e))
    }

    fn contains(&self, address: Address) -> bool {
        self.path_for(address).exists()
    }

    /// Directory the ABIs live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AbiSource for DirAbiSource {
    async fn fetch_abi(&self, address: Address) -> Result<JsonAbi> {
        self.read(address)
    }
}

/// Serve ABIs from a directory, fetching and storing misses via `inner`.
#[derive(Debug, Clone)]
pub struct CachedAbiSource<S> {
    cache: DirAbiSource,
    inner: S,
}

impl<S: AbiSource> CachedAbiSource<S> {
    /// Cache `inner` in `dir`.
    pub fn new(dir: impl Into<PathBuf>, inner: S) -> Self {
        Self {
            cache: DirAbiSource::new(dir),
            inner,
        }
    }
}

impl<S: AbiSource> AbiSource for CachedAbiSource<S> {
    async fn fetch_abi(&self, address: Address) -> Result<JsonAbi> {
        if self.cache.contains(address) {
            tracing::debug!(%address, dir = %self.cache.dir().display(), "ABI cache hit");
            return self.cache.read(address);
        }

        let abi = self.inner.fetch_abi(address).await?;
        if let Err(e) = self.cache.store(address, &abi) {
            tracing::warn!(%address, error = %e, "could not cache ABI");
        }
        Ok(abi)
    }
}
