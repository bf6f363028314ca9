//! Read-only chain client with ordered RPC fallback.
//!
//! Every read is tried against each configured endpoint in turn; the first
//! success wins. Callers never see which endpoint answered.

use std::future::Future;
use std::time::Duration;

use alloy::contract::{ContractInstance, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::eips::BlockNumberOrTag;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log};
use alloy::sol;

use crate::error::{Error, Result};

sol! {
    #[sol(rpc)]
    interface IERC20Metadata {
        function symbol() external view returns (string);
    }
}

#[derive(Clone)]
struct Endpoint {
    url: String,
    provider: DynProvider,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("url", &self.url).finish_non_exhaustive()
    }
}

/// JSON-RPC client over an ordered list of endpoints.
#[derive(Debug, Clone)]
pub struct FallbackClient {
    endpoints: Vec<Endpoint>,
    timeout: Option<Duration>,
}

impl FallbackClient {
    /// Build HTTP providers for `urls`, best first.
    ///
    /// No request is sent until the first read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEndpoints`] for an empty list and
    /// [`Error::InvalidUrl`] if any URL does not parse.
    pub fn connect<S: AsRef<str>>(urls: &[S]) -> Result<Self> {
        if urls.is_empty() {
            return Err(Error::NoEndpoints);
        }
        let endpoints = urls
            .iter()
            .map(|url| {
                let url = url.as_ref();
                let parsed = url.parse().map_err(|_| Error::InvalidUrl {
                    url: url.to_owned(),
                })?;
                Ok(Endpoint {
                    url: url.to_owned(),
                    provider: ProviderBuilder::new().connect_http(parsed).erased(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            endpoints,
            timeout: None,
        })
    }

    /// Fail over to the next endpoint when a request exceeds `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configured endpoint URLs, in fallback order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(|e| e.url.as_str())
    }

    /// Run `op` against each endpoint until one succeeds.
    async fn with_fallback<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let request = f(endpoint.provider.clone());
            let result = match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, request)
                    .await
                    .map_err(|_| Error::Timeout { op })
                    .and_then(|r| r),
                None => request.await,
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if let Some(next) = self.endpoints.get(i + 1) {
                        tracing::warn!(
                            op,
                            rpc = %endpoint.url,
                            next = %next.url,
                            error = %e,
                            "RPC failed, falling back"
                        );
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(Error::NoEndpoints))
    }

    /// Current head block number.
    ///
    /// # Errors
    ///
    /// Returns the last endpoint's error if every endpoint fails.
    pub async fn block_number(&self) -> Result<u64> {
        self.with_fallback("eth_blockNumber", |provider| async move {
            Ok(provider.get_block_number().await?)
        })
        .await
    }

    /// Timestamp (unix seconds) of block `number`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlockNotFound`] if the endpoints do not know the
    /// block, or the last transport error.
    pub async fn block_timestamp(&self, number: u64) -> Result<u64> {
        self.with_fallback("eth_getBlockByNumber", |provider| async move {
            let block = provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .await?
                .ok_or(Error::BlockNotFound(number))?;
            Ok(block.header.timestamp)
        })
        .await
    }

    /// Logs matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the last endpoint's error if every endpoint fails.
    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        self.with_fallback("eth_getLogs", |provider| {
            let filter = filter.clone();
            async move { Ok(provider.get_logs(&filter).await?) }
        })
        .await
    }

    /// Call the argument-less view `function` of `address` through `abi`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAbiItem`] if `abi` lacks the function, or the
    /// last contract/transport error.
    pub async fn call(
        &self,
        address: Address,
        abi: &JsonAbi,
        function: &'static str,
    ) -> Result<Vec<DynSolValue>> {
        if abi.function(function).is_none() {
            return Err(Error::MissingAbiItem {
                contract: address,
                kind: "function",
                name: function.to_owned(),
            });
        }

        self.with_fallback("eth_call", |provider| {
            let interface = Interface::new(abi.clone());
            async move {
                let contract = ContractInstance::new(address, provider, interface);
                Ok(contract.function(function, &[])?.call().await?)
            }
        })
        .await
    }

    /// ERC-20 `symbol()` of `token`.
    ///
    /// # Errors
    ///
    /// Returns the last contract/transport error.
    pub async fn symbol(&self, token: Address) -> Result<String> {
        self.with_fallback("symbol", |provider| async move {
            let erc20 = IERC20Metadata::new(token, provider);
            Ok(erc20.symbol().call().await?)
        })
        .await
    }
}
