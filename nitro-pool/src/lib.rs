//! Camelot NitroPool reward scanner.
//!
//! Resolves a NitroPool's configuration through ABIs fetched at runtime and
//! accumulates lifetime reward totals by scanning `AddRewardsToken1`,
//! `AddRewardsToken2` and `Harvest` logs in fixed-size block ranges.
//!
//! ```no_run
//! use nitro_pool::abi::ExplorerAbiSource;
//! use nitro_pool::client::FallbackClient;
//! use nitro_pool::networks::Network;
//! use nitro_pool::scan::{NitroPoolEvents, ScanConfig, Scanner};
//!
//! # async fn run() -> nitro_pool::Result<()> {
//! let network = Network::ArbitrumOne;
//! let preset = network.default_pool().expect("Arbitrum One has a preset");
//! let client = FallbackClient::connect(network.default_rpcs())?;
//! let abis = ExplorerAbiSource::new(ExplorerAbiSource::DEFAULT_URL, None, network.chain_id());
//!
//! let pool = nitro_pool::resolver::resolve(&client, &abis, preset.pool).await?;
//! let events = NitroPoolEvents::new(&client, preset.pool, &pool.abi)?;
//! let latest = client.block_number().await?;
//! let config = ScanConfig::new(preset.start_block, 50_000)?;
//! let report = Scanner::new(&events, &pool.summary, config)
//!     .run(latest, &mut ())
//!     .await;
//! println!("{:?}", report.totals);
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod client;
pub mod error;
pub mod networks;
pub mod resolver;
pub mod scan;
pub mod types;
pub mod units;

pub use error::{Error, Result};
