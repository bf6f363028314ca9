//! Supported chains and the pool presets known for them.
//!
//! Camelot NitroPools live on Arbitrum chains. Each [`Network`] carries its
//! EIP-155 chain ID and a list of public RPC endpoints used when the
//! configuration provides none.

use alloy::primitives::{Address, address};

/// A pool that can be reported without any extra configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPreset {
    /// The NitroPool contract.
    pub pool: Address,
    /// Block at which scanning starts (pool deployment).
    pub start_block: u64,
}

/// Chains with Camelot NitroPool deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Network {
    /// Arbitrum One (chain ID 42161).
    #[default]
    ArbitrumOne,
    /// Arbitrum Nova (chain ID 42170).
    ArbitrumNova,
    /// Arbitrum Sepolia testnet (chain ID 421614).
    ArbitrumSepolia,
}

const ARBITRUM_ONE_POOL: PoolPreset = PoolPreset {
    pool: address!("93b9965cdc531a2659d0982c83d2f56Dc01B9fBE"),
    start_block: 39_952_704,
};

impl Network {
    /// All supported networks.
    pub const ALL: &[Self] = &[Self::ArbitrumOne, Self::ArbitrumNova, Self::ArbitrumSepolia];

    /// Returns the EIP-155 chain ID for this network.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::ArbitrumOne => 42161,
            Self::ArbitrumNova => 42170,
            Self::ArbitrumSepolia => 421_614,
        }
    }

    /// Public RPC endpoints, best first.
    #[must_use]
    pub const fn default_rpcs(self) -> &'static [&'static str] {
        match self {
            Self::ArbitrumOne => &[
                "https://arb1.arbitrum.io/rpc",
                "https://arbitrum-one-rpc.publicnode.com",
                "https://arbitrum.drpc.org",
            ],
            Self::ArbitrumNova => &["https://nova.arbitrum.io/rpc"],
            Self::ArbitrumSepolia => &["https://sepolia-rollup.arbitrum.io/rpc"],
        }
    }

    /// The pool reported by default on this network, if any.
    #[must_use]
    pub const fn default_pool(self) -> Option<PoolPreset> {
        match self {
            Self::ArbitrumOne => Some(ARBITRUM_ONE_POOL),
            Self::ArbitrumNova | Self::ArbitrumSepolia => None,
        }
    }

    /// Whether this is a testnet deployment.
    #[must_use]
    pub const fn is_testnet(self) -> bool {
        matches!(self, Self::ArbitrumSepolia)
    }

    /// Look up a [`Network`] by its EIP-155 chain ID.
    #[must_use]
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.iter().find(|n| n.chain_id() == chain_id).copied()
    }
}
