//! NitroPool rewards report CLI.
//!
//! Resolves a Camelot NitroPool's configuration, scans its reward events
//! from the start block to the current head, and prints the totals.
//!
//! # Usage
//!
//! ```bash
//! # Report the default Arbitrum One pool using public RPCs
//! nitro-pool-report report --api-key $ETHERSCAN_KEY
//!
//! # Report another pool from a given block
//! nitro-pool-report report --pool 0x... --start-block 150000000
//!
//! # Use a config file and cache ABIs locally
//! nitro-pool-report report --config nitro-pool.toml --abi-dir ./abis
//!
//! # List supported networks
//! nitro-pool-report networks
//! ```

use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nitro_pool::abi::{AbiSource, CachedAbiSource, ExplorerAbiSource};
use nitro_pool::client::FallbackClient;
use nitro_pool::networks::Network;
use nitro_pool::resolver::{self, ResolvedPool};
use nitro_pool::scan::{NitroPoolEvents, Scanner};
use nitro_pool_report::config::{Config, Overrides, RunConfig};
use nitro_pool_report::render::{self, ConsoleObserver};

/// Camelot NitroPool rewards report.
#[derive(Debug, Parser)]
#[command(name = "nitro-pool-report", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Print pool configuration and lifetime reward totals.
    Report(ReportArgs),

    /// List supported networks.
    Networks,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// TOML configuration file; ignored if absent.
    #[arg(long, default_value = "nitro-pool.toml")]
    config: PathBuf,

    /// EIP-155 chain ID (default: Arbitrum One).
    #[arg(long = "chain")]
    chain_id: Option<u64>,

    /// NitroPool contract address.
    #[arg(long)]
    pool: Option<Address>,

    /// First block to scan.
    #[arg(long)]
    start_block: Option<u64>,

    /// Blocks per `eth_getLogs` request.
    #[arg(long)]
    chunk_size: Option<u64>,

    /// RPC endpoint; repeat for fallbacks, best first.
    #[arg(long = "rpc")]
    rpcs: Vec<String>,

    /// Block explorer API key used to fetch contract ABIs.
    #[arg(long, env = "NITRO_EXPLORER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory caching fetched ABIs.
    #[arg(long)]
    abi_dir: Option<PathBuf>,
}

impl ReportArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            chain_id: self.chain_id,
            pool: self.pool,
            start_block: self.start_block,
            chunk_size: self.chunk_size,
            rpcs: self.rpcs.clone(),
            api_key: self.api_key.clone(),
            abi_dir: self.abi_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => cmd_report(&args).await,
        Command::Networks => {
            cmd_networks();
            Ok(())
        }
    }
}

/// Execute the `report` subcommand.
async fn cmd_report(args: &ReportArgs) -> Result<()> {
    let run = Config::load(&args.config)?
        .with_overrides(args.overrides())
        .resolve()?;

    tracing::info!(
        chain_id = run.chain_id,
        pool = %run.pool,
        start_block = run.scan.start_block,
        rpcs = run.rpcs.len(),
        "starting report"
    );

    let client = FallbackClient::connect(&run.rpcs)?.with_timeout(run.request_timeout);
    let explorer = ExplorerAbiSource::new(&run.explorer_url, run.api_key.clone(), run.chain_id);
    let pool = match &run.abi_dir {
        Some(dir) => resolve_pool(&client, &CachedAbiSource::new(dir, explorer), &run).await,
        None => resolve_pool(&client, &explorer, &run).await,
    }?;

    print_table(&render::config_rows(&pool.summary));

    let events = NitroPoolEvents::new(&client, run.pool, &pool.abi)?;
    let latest = client
        .block_number()
        .await
        .context("fetching latest block number")?;

    let mut observer = ConsoleObserver::stdio(&pool.summary);
    let report = Scanner::new(&events, &pool.summary, run.scan)
        .run(latest, &mut observer)
        .await;
    observer.finish(&report)?;

    print_table(&render::summary_rows(&pool.summary, &report));

    if report.is_partial() {
        tracing::warn!(
            skipped = report.failed_ranges.len(),
            "some block ranges failed; totals under-count"
        );
    }
    Ok(())
}

async fn resolve_pool<A: AbiSource>(
    client: &FallbackClient,
    abis: &A,
    run: &RunConfig,
) -> Result<ResolvedPool> {
    resolver::resolve(client, abis, run.pool)
        .await
        .with_context(|| format!("resolving NitroPool {}", run.pool))
}

#[allow(clippy::print_stdout, reason = "report output")]
fn print_table(rows: &[render::Row]) {
    println!("{}", render::render_table(rows));
}

/// Execute the `networks` subcommand.
#[allow(clippy::print_stdout, reason = "report output")]
fn cmd_networks() {
    println!("{:<12} {:<18} {:<8} {:<44} RPC", "Chain ID", "Name", "Type", "Default pool");
    println!("{}", "-".repeat(110));

    for network in Network::ALL {
        let net_type = if network.is_testnet() { "test" } else { "main" };
        let pool = network
            .default_pool()
            .map_or_else(|| "-".to_owned(), |p| p.pool.to_string());
        println!(
            "{:<12} {:<18} {:<8} {:<44} {}",
            network.chain_id(),
            format!("{network:?}"),
            net_type,
            pool,
            network.default_rpcs().first().copied().unwrap_or("-"),
        );
    }
}
