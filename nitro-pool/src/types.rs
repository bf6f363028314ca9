//! Core domain types: pool snapshot, scan ranges, reward events and totals.

use alloy::primitives::{Address, U256};

/// An inclusive span of blocks queried as one `eth_getLogs` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanRange {
    /// First block of the range.
    pub from_block: u64,
    /// Last block of the range (inclusive).
    pub to_block: u64,
}

impl ScanRange {
    /// Create a range; `from_block` must not exceed `to_block`.
    #[must_use]
    pub const fn new(from_block: u64, to_block: u64) -> Self {
        debug_assert!(from_block <= to_block, "inverted block range");
        Self {
            from_block,
            to_block,
        }
    }

    /// Number of blocks covered, saturating at `u64::MAX`.
    #[must_use]
    pub const fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.to_block - self.from_block).saturating_add(1)
    }

    /// Whether the bounds are inverted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from_block > self.to_block
    }
}

impl std::fmt::Display for ScanRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.from_block, self.to_block)
    }
}

/// Which of the two reward tokens a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardSlot {
    /// `rewardsToken1`.
    One,
    /// `rewardsToken2`.
    Two,
}

impl RewardSlot {
    /// Both slots, in display order.
    pub const BOTH: [Self; 2] = [Self::One, Self::Two];

    /// Name of the pool event emitted when rewards are added to this slot.
    #[must_use]
    pub const fn added_event(self) -> &'static str {
        match self {
            Self::One => "AddRewardsToken1",
            Self::Two => "AddRewardsToken2",
        }
    }
}

/// A reward-related event observed on the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardEvent {
    /// `AddRewardsToken1` / `AddRewardsToken2`.
    Added {
        /// Reward token the amount was added to.
        slot: RewardSlot,
        /// Raw token amount (18 decimals).
        amount: U256,
        /// Block containing the event.
        block_number: u64,
        /// Timestamp of that block (unix seconds).
        timestamp: u64,
    },
    /// `Harvest` by any user.
    Harvested {
        /// Token that was harvested, as emitted by the pool.
        token: Address,
        /// Raw token amount (18 decimals).
        amount: U256,
    },
}

/// Lifetime reward accumulators, kept in raw token units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    /// Total of `AddRewardsToken1` amounts.
    pub token1_added: U256,
    /// Total of `AddRewardsToken2` amounts.
    pub token2_added: U256,
    /// Total harvested of reward token 1.
    pub token1_harvested: U256,
    /// Total harvested of reward token 2.
    pub token2_harvested: U256,
}

impl RunningTotals {
    /// Record rewards added to `slot`.
    pub fn add(&mut self, slot: RewardSlot, amount: U256) {
        let total = match slot {
            RewardSlot::One => &mut self.token1_added,
            RewardSlot::Two => &mut self.token2_added,
        };
        *total = total.saturating_add(amount);
    }

    /// Record rewards harvested from `slot`.
    pub fn harvest(&mut self, slot: RewardSlot, amount: U256) {
        let total = match slot {
            RewardSlot::One => &mut self.token1_harvested,
            RewardSlot::Two => &mut self.token2_harvested,
        };
        *total = total.saturating_add(amount);
    }

    /// Fold another set of totals into this one.
    pub fn merge(&mut self, other: &Self) {
        for slot in RewardSlot::BOTH {
            self.add(slot, other.added(slot));
            self.harvest(slot, other.harvested(slot));
        }
    }

    /// Total added to `slot`.
    #[must_use]
    pub const fn added(&self, slot: RewardSlot) -> U256 {
        match slot {
            RewardSlot::One => self.token1_added,
            RewardSlot::Two => self.token2_added,
        }
    }

    /// Total harvested from `slot`.
    #[must_use]
    pub const fn harvested(&self, slot: RewardSlot) -> U256 {
        match slot {
            RewardSlot::One => self.token1_harvested,
            RewardSlot::Two => self.token2_harvested,
        }
    }

    /// Share of the added amount already harvested, in percent with two
    /// decimals. `None` while nothing has been added.
    #[must_use]
    pub fn harvested_percent(&self, slot: RewardSlot) -> Option<f64> {
        let added = self.added(slot);
        if added.is_zero() {
            return None;
        }
        // Half-up rounding to whole basis points.
        let basis_points = self
            .harvested(slot)
            .saturating_mul(U256::from(20_000))
            .saturating_add(added)
            / added.saturating_mul(U256::from(2));
        let basis_points = u64::try_from(basis_points).unwrap_or(u64::MAX);
        Some(basis_points as f64 / 100.0)
    }
}

/// An ERC-20 token and its symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token contract.
    pub address: Address,
    /// `symbol()` result.
    pub symbol: String,
}

/// The single `settings()` read of a NitroPool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Rewards start accruing (unix seconds).
    pub start_time: u64,
    /// Rewards stop accruing.
    pub end_time: u64,
    /// Harvesting allowed from.
    pub harvest_start_time: u64,
    /// Deposits refused after.
    pub deposit_end_time: u64,
    /// Minimum spNFT lock duration, in seconds (0 = none).
    pub lock_duration_req: u64,
    /// spNFT must be locked at least until this time (0 = none).
    pub lock_end_req: u64,
    /// Minimum LP amount in the deposited spNFT (0 = none).
    pub deposit_amount_req: U256,
    /// Deposits require whitelisting.
    pub whitelist: bool,
    /// Free-form pool description.
    pub description: String,
}

/// Snapshot of everything resolved about a pool before scanning.
///
/// Built once by [`crate::resolver::resolve`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    /// The NitroPool contract.
    pub pool: Address,
    /// The NFT pool whose spNFTs are deposited.
    pub nft_pool: Address,
    /// The LP token staked in the NFT pool.
    pub lp_token: Address,
    /// Underlying pair tokens of the LP token.
    pub pair: (TokenInfo, TokenInfo),
    /// Reward token 1.
    pub rewards_token1: TokenInfo,
    /// Reward token 2.
    pub rewards_token2: TokenInfo,
    /// `creationTime()`.
    pub creation_time: u64,
    /// `publishTime()`.
    pub publish_time: u64,
    /// `settings()`.
    pub settings: PoolSettings,
}

impl PoolSummary {
    /// Reward token for `slot`.
    #[must_use]
    pub const fn reward_token(&self, slot: RewardSlot) -> &TokenInfo {
        match slot {
            RewardSlot::One => &self.rewards_token1,
            RewardSlot::Two => &self.rewards_token2,
        }
    }

    /// The slot `token` is rewarded in, if it is one of the reward tokens.
    ///
    /// Addresses compare as raw bytes, so checksum casing never matters.
    #[must_use]
    pub fn slot_of(&self, token: Address) -> Option<RewardSlot> {
        RewardSlot::BOTH
            .into_iter()
            .find(|slot| self.reward_token(*slot).address == token)
    }

    /// `SYM0-SYM1` label of the LP pair.
    #[must_use]
    pub fn pair_label(&self) -> String {
        format!("{}-{}", self.pair.0.symbol, self.pair.1.symbol)
    }
}
