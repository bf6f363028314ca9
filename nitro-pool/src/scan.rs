//! Chunked scan of pool reward events.
//!
//! `[start_block, latest]` is split into contiguous ranges of at most
//! `chunk_size` blocks. Each range is fetched and accumulated in order; a
//! range whose fetch fails is logged, reported and skipped without touching
//! the totals. There is no retry, so skipped ranges under-count the result.

use std::future::Future;
use std::num::NonZeroU64;

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Address, U256};
use alloy::rpc::types::{Filter, Log};

use crate::client::FallbackClient;
use crate::error::{Error, Result};
use crate::resolver::{address_at, uint_at};
use crate::types::{PoolSummary, RewardEvent, RewardSlot, RunningTotals, ScanRange};
use crate::units::days_between;

/// Default number of blocks per `eth_getLogs` request.
pub const DEFAULT_CHUNK_SIZE: u64 = 50_000;

/// Where to start scanning and how wide each range is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// First block to scan.
    pub start_block: u64,
    /// Maximum blocks per range.
    pub chunk_size: NonZeroU64,
}

impl ScanConfig {
    /// Validate and build a scan configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScan`] if `chunk_size` is zero.
    pub fn new(start_block: u64, chunk_size: u64) -> Result<Self> {
        let chunk_size = NonZeroU64::new(chunk_size)
            .ok_or_else(|| Error::InvalidScan("chunk size must be at least 1".to_owned()))?;
        Ok(Self {
            start_block,
            chunk_size,
        })
    }

    /// Ranges covering `[start_block, latest]`.
    #[must_use]
    pub const fn ranges(&self, latest: u64) -> Ranges {
        ranges(self.start_block, latest, self.chunk_size)
    }
}

/// Split `[start, latest]` into contiguous ranges of at most `chunk_size`
/// blocks. Yields nothing when `start > latest`.
#[must_use]
pub const fn ranges(start: u64, latest: u64, chunk_size: NonZeroU64) -> Ranges {
    Ranges {
        next: Some(start),
        latest,
        chunk_size: chunk_size.get(),
    }
}

/// Iterator returned by [`ranges`].
#[derive(Debug, Clone)]
pub struct Ranges {
    next: Option<u64>,
    latest: u64,
    chunk_size: u64,
}

impl Iterator for Ranges {
    type Item = ScanRange;

    fn next(&mut self) -> Option<ScanRange> {
        let from = self.next.filter(|from| *from <= self.latest)?;
        let to = from.saturating_add(self.chunk_size - 1).min(self.latest);
        self.next = to.checked_add(1);
        Some(ScanRange::new(from, to))
    }
}

/// A decoded `AddRewardsToken*` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedLog {
    /// Amount added (raw units).
    pub amount: U256,
    /// Block containing the log.
    pub block_number: u64,
}

/// A decoded `Harvest` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestLog {
    /// Harvesting user.
    pub user: Address,
    /// Harvested token.
    pub token: Address,
    /// Amount harvested (raw units).
    pub amount: U256,
}

/// Read access to a pool's reward events.
pub trait PoolEvents {
    /// `AddRewardsToken1` or `AddRewardsToken2` logs in `range`, in log order.
    fn added(
        &self,
        slot: RewardSlot,
        range: ScanRange,
    ) -> impl Future<Output = Result<Vec<AddedLog>>>;

    /// `Harvest` logs of any user in `range`, in log order.
    fn harvests(&self, range: ScanRange) -> impl Future<Output = Result<Vec<HarvestLog>>>;

    /// Timestamp of `block` (unix seconds).
    fn block_timestamp(&self, block: u64) -> impl Future<Output = Result<u64>>;
}

/// [`PoolEvents`] backed by `eth_getLogs` and the pool's ABI.
#[derive(Debug, Clone)]
pub struct NitroPoolEvents<'a> {
    client: &'a FallbackClient,
    pool: Address,
    add_token1: Event,
    add_token2: Event,
    harvest: Event,
}

impl<'a> NitroPoolEvents<'a> {
    /// Look up the reward events in `abi`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAbiItem`] if any of `AddRewardsToken1`,
    /// `AddRewardsToken2` or `Harvest` is missing.
    pub fn new(client: &'a FallbackClient, pool: Address, abi: &JsonAbi) -> Result<Self> {
        let event = |name: &str| {
            abi.event(name)
                .and_then(|overloads| overloads.first())
                .cloned()
                .ok_or_else(|| Error::MissingAbiItem {
                    contract: pool,
                    kind: "event",
                    name: name.to_owned(),
                })
        };
        Ok(Self {
            client,
            pool,
            add_token1: event(RewardSlot::One.added_event())?,
            add_token2: event(RewardSlot::Two.added_event())?,
            harvest: event("Harvest")?,
        })
    }

    async fn decoded_logs(
        &self,
        event: &Event,
        range: ScanRange,
    ) -> Result<Vec<(Log, Vec<DynSolValue>)>> {
        let filter = Filter::new()
            .address(self.pool)
            .event_signature(event.selector())
            .from_block(range.from_block)
            .to_block(range.to_block);

        let logs = self.client.logs(&filter).await?;
        tracing::debug!(event = %event.name, %range, count = logs.len(), "fetched logs");

        logs.into_iter()
            .map(|log| {
                let args = event_args(event, &log)?;
                Ok((log, args))
            })
            .collect()
    }
}

impl PoolEvents for NitroPoolEvents<'_> {
    async fn added(&self, slot: RewardSlot, range: ScanRange) -> Result<Vec<AddedLog>> {
        let event = match slot {
            RewardSlot::One => &self.add_token1,
            RewardSlot::Two => &self.add_token2,
        };
        self.decoded_logs(event, range)
            .await?
            .into_iter()
            .map(|(log, args)| {
                let block_number = log
                    .block_number
                    .ok_or_else(|| Error::unexpected(event.name.clone(), "log without block number"))?;
                Ok(AddedLog {
                    amount: uint_at(&args, 0, &event.name)?,
                    block_number,
                })
            })
            .collect()
    }

    async fn harvests(&self, range: ScanRange) -> Result<Vec<HarvestLog>> {
        let name = &self.harvest.name;
        self.decoded_logs(&self.harvest, range)
            .await?
            .into_iter()
            .map(|(_log, args)| {
                Ok(HarvestLog {
                    user: address_at(&args, 0, name)?,
                    token: address_at(&args, 1, name)?,
                    amount: uint_at(&args, 2, name)?,
                })
            })
            .collect()
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        self.client.block_timestamp(block).await
    }
}

/// Decode `log` and return its arguments in declaration order, with
/// indexed and non-indexed inputs interleaved as the ABI declares them.
pub(crate) fn event_args(event: &Event, log: &Log) -> Result<Vec<DynSolValue>> {
    let decoded = event.decode_log(log.data())?;
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();

    event
        .inputs
        .iter()
        .map(|input| {
            let value = if input.indexed {
                indexed.next()
            } else {
                body.next()
            };
            value.ok_or_else(|| Error::unexpected(event.name.clone(), "fewer values than inputs"))
        })
        .collect()
}

/// Callbacks fired while scanning, for progress display.
pub trait ScanObserver {
    /// A range is about to be fetched.
    fn range_started(
        &mut self,
        _range: ScanRange,
        _totals: &RunningTotals,
        _days_since_start: Option<f64>,
    ) {
    }

    /// A range completed and contained this reward addition.
    fn reward_added(&mut self, _event: &RewardEvent) {}

    /// A range failed and was skipped.
    fn range_failed(&mut self, _range: ScanRange, _error: &Error) {}
}

impl ScanObserver for () {}

/// Result of a complete scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Totals over every successfully scanned range.
    pub totals: RunningTotals,
    /// Reward additions, in discovery order.
    pub added: Vec<RewardEvent>,
    /// Harvests credited to a reward token.
    pub harvests_counted: usize,
    /// Harvests of tokens that are not reward tokens.
    pub harvests_ignored: usize,
    /// Ranges skipped after an error; their events are missing from `totals`.
    pub failed_ranges: Vec<ScanRange>,
    /// Ranges scanned successfully.
    pub ranges_scanned: usize,
    /// `latest - start_block`.
    pub blocks_scanned: u64,
    /// Days from the pool start time to the end of the last scanned range
    /// (negative before the start).
    pub days_since_start: Option<f64>,
}

impl ScanReport {
    /// Whether any range was skipped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed_ranges.is_empty()
    }
}

/// Contribution of a single range, committed only when complete.
#[derive(Debug, Default)]
struct RangeOutcome {
    totals: RunningTotals,
    added: Vec<RewardEvent>,
    harvests_counted: usize,
    harvests_ignored: usize,
    days_since_start: f64,
}

impl RangeOutcome {
    fn apply(&mut self, summary: &PoolSummary, event: RewardEvent) {
        match event {
            RewardEvent::Added { slot, amount, .. } => {
                self.totals.add(slot, amount);
                self.added.push(event);
            }
            RewardEvent::Harvested { token, amount } => match summary.slot_of(token) {
                Some(slot) => {
                    self.totals.harvest(slot, amount);
                    self.harvests_counted += 1;
                }
                None => {
                    tracing::debug!(%token, %amount, "ignoring harvest of non-reward token");
                    self.harvests_ignored += 1;
                }
            },
        }
    }
}

/// Sequential scan accumulator for one pool.
#[derive(Debug)]
pub struct Scanner<'a, E> {
    events: &'a E,
    summary: &'a PoolSummary,
    config: ScanConfig,
}

impl<'a, E: PoolEvents> Scanner<'a, E> {
    /// Scan the pool described by `summary` through `events`.
    pub const fn new(events: &'a E, summary: &'a PoolSummary, config: ScanConfig) -> Self {
        Self {
            events,
            summary,
            config,
        }
    }

    /// Scan every range up to `latest`, which the caller captures once
    /// before scanning; blocks produced meanwhile are not included.
    pub async fn run<O: ScanObserver>(&self, latest: u64, observer: &mut O) -> ScanReport {
        let mut report = ScanReport {
            blocks_scanned: latest.saturating_sub(self.config.start_block),
            ..ScanReport::default()
        };

        tracing::info!(
            from = self.config.start_block,
            to = latest,
            chunk_size = self.config.chunk_size.get(),
            "scanning reward events"
        );

        for range in self.config.ranges(latest) {
            observer.range_started(range, &report.totals, report.days_since_start);

            match self.scan_range(range).await {
                Ok(outcome) => {
                    report.totals.merge(&outcome.totals);
                    for event in &outcome.added {
                        observer.reward_added(event);
                    }
                    report.added.extend(outcome.added);
                    report.harvests_counted += outcome.harvests_counted;
                    report.harvests_ignored += outcome.harvests_ignored;
                    report.days_since_start = Some(outcome.days_since_start);
                    report.ranges_scanned += 1;
                }
                Err(e) => {
                    tracing::error!(
                        from = range.from_block,
                        to = range.to_block,
                        error = %e,
                        "failed to scan range, skipping"
                    );
                    observer.range_failed(range, &e);
                    report.failed_ranges.push(range);
                }
            }
        }

        tracing::info!(
            ranges = report.ranges_scanned,
            failed = report.failed_ranges.len(),
            added = report.added.len(),
            harvests = report.harvests_counted,
            "scan finished"
        );
        report
    }

    async fn scan_range(&self, range: ScanRange) -> Result<RangeOutcome> {
        let added1 = self.events.added(RewardSlot::One, range).await?;
        let added2 = self.events.added(RewardSlot::Two, range).await?;
        let harvests = self.events.harvests(range).await?;

        let mut outcome = RangeOutcome::default();
        for (slot, logs) in [(RewardSlot::One, added1), (RewardSlot::Two, added2)] {
            for log in logs {
                let timestamp = self.events.block_timestamp(log.block_number).await?;
                outcome.apply(
                    self.summary,
                    RewardEvent::Added {
                        slot,
                        amount: log.amount,
                        block_number: log.block_number,
                        timestamp,
                    },
                );
            }
        }

        for harvest in harvests {
            outcome.apply(
                self.summary,
                RewardEvent::Harvested {
                    token: harvest.token,
                    amount: harvest.amount,
                },
            );
        }

        let end = self.events.block_timestamp(range.to_block).await?;
        outcome.days_since_start = days_between(self.summary.settings.start_time, end);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use alloy::primitives::LogData;

    use super::*;
    use crate::abi::tests::nitro_pool_abi;
    use crate::types::tests::summary;
    use crate::units::format_ether;

    const GENESIS: u64 = 1_700_000_000;
    const ONE_TOKEN: u64 = 1_000_000_000_000_000_000;

    fn token1() -> Address {
        Address::repeat_byte(0x01)
    }

    fn token2() -> Address {
        Address::repeat_byte(0x02)
    }

    fn chunk(size: u64) -> NonZeroU64 {
        NonZeroU64::new(size).unwrap()
    }

    /// In-memory chain: one block every 12 seconds from `GENESIS`.
    #[derive(Default)]
    struct MockChain {
        adds: Vec<(RewardSlot, u64, u64)>,
        harvests: Vec<(u64, Address, u64)>,
        failing: HashSet<u64>,
        fetched: RefCell<Vec<ScanRange>>,
    }

    impl MockChain {
        fn add(mut self, slot: RewardSlot, block: u64, amount: u64) -> Self {
            self.adds.push((slot, block, amount));
            self
        }

        fn harvest(mut self, block: u64, token: Address, amount: u64) -> Self {
            self.harvests.push((block, token, amount));
            self
        }

        fn fail_range(mut self, from_block: u64) -> Self {
            self.failing.insert(from_block);
            self
        }
    }

    const fn contains(range: ScanRange, block: u64) -> bool {
        range.from_block <= block && block <= range.to_block
    }

    impl PoolEvents for MockChain {
        async fn added(&self, slot: RewardSlot, range: ScanRange) -> Result<Vec<AddedLog>> {
            if slot == RewardSlot::One {
                self.fetched.borrow_mut().push(range);
            }
            Ok(self
                .adds
                .iter()
                .filter(|(s, block, _)| *s == slot && contains(range, *block))
                .map(|(_, block, amount)| AddedLog {
                    amount: U256::from(*amount),
                    block_number: *block,
                })
                .collect())
        }

        async fn harvests(&self, range: ScanRange) -> Result<Vec<HarvestLog>> {
            if self.failing.contains(&range.from_block) {
                return Err(Error::Timeout { op: "eth_getLogs" });
            }
            Ok(self
                .harvests
                .iter()
                .filter(|(block, _, _)| contains(range, *block))
                .map(|(_, token, amount)| HarvestLog {
                    user: Address::repeat_byte(0xee),
                    token: *token,
                    amount: U256::from(*amount),
                })
                .collect())
        }

        async fn block_timestamp(&self, block: u64) -> Result<u64> {
            Ok(GENESIS + block * 12)
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<ScanRange>,
        added: Vec<RewardEvent>,
        failed: Vec<ScanRange>,
    }

    impl ScanObserver for Recorder {
        fn range_started(&mut self, range: ScanRange, _: &RunningTotals, _: Option<f64>) {
            self.started.push(range);
        }

        fn reward_added(&mut self, event: &RewardEvent) {
            self.added.push(event.clone());
        }

        fn range_failed(&mut self, range: ScanRange, _: &Error) {
            self.failed.push(range);
        }
    }

    async fn scan(chain: &MockChain, start: u64, latest: u64, chunk_size: u64) -> ScanReport {
        let summary = summary(token1(), token2());
        let config = ScanConfig::new(start, chunk_size).unwrap();
        Scanner::new(chain, &summary, config).run(latest, &mut ()).await
    }

    #[test]
    fn single_block_scan_is_one_range() {
        let all: Vec<_> = ranges(100, 100, chunk(50)).collect();
        assert_eq!(all, [ScanRange::new(100, 100)], "one range");
    }

    #[test]
    fn full_chunks_split_exactly() {
        let all: Vec<_> = ranges(0, 149_999, chunk(50_000)).collect();
        assert_eq!(
            all,
            [
                ScanRange::new(0, 49_999),
                ScanRange::new(50_000, 99_999),
                ScanRange::new(100_000, 149_999),
            ],
            "three full ranges"
        );
    }

    #[test]
    fn start_past_head_scans_nothing() {
        assert_eq!(ranges(10, 9, chunk(5)).count(), 0, "empty");
    }

    #[test]
    fn ranges_stop_at_u64_max() {
        let all: Vec<_> = ranges(u64::MAX - 5, u64::MAX, chunk(4)).collect();
        assert_eq!(
            all,
            [
                ScanRange::new(u64::MAX - 5, u64::MAX - 2),
                ScanRange::new(u64::MAX - 1, u64::MAX),
            ],
            "no overflow at the top of the block space"
        );
    }

    #[test]
    fn ranges_cover_contiguously_without_gaps() {
        for (start, latest, size) in [
            (0, 0, 1),
            (0, 10, 1),
            (7, 7_000, 13),
            (39_952_704, 40_100_000, 50_000),
            (5, 104, 100),
            (5, 105, 100),
        ] {
            let all: Vec<_> = ranges(start, latest, chunk(size)).collect();
            assert_eq!(all.first().map(|r| r.from_block), Some(start), "starts at start");
            assert_eq!(all.last().map(|r| r.to_block), Some(latest), "ends at head");
            for pair in all.windows(2) {
                assert_eq!(pair[1].from_block, pair[0].to_block + 1, "contiguous");
            }
            for range in &all {
                assert!(range.from_block <= range.to_block, "non-empty {range}");
                assert!(range.len() <= size, "{range} wider than {size}");
            }
            let covered: u64 = all.iter().map(ScanRange::len).sum();
            assert_eq!(covered, latest - start + 1, "every block exactly once");
        }
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(
            matches!(ScanConfig::new(0, 0), Err(Error::InvalidScan(_))),
            "zero chunk"
        );
    }

    #[tokio::test]
    async fn totals_sum_every_category_across_ranges() {
        let chain = MockChain::default()
            .add(RewardSlot::One, 3, 10)
            .add(RewardSlot::One, 25, 5)
            .add(RewardSlot::Two, 12, 7)
            .harvest(4, token1(), 3)
            .harvest(18, token2(), 2)
            .harvest(29, token1(), 1);

        let report = scan(&chain, 0, 29, 10).await;

        assert_eq!(report.totals.token1_added, U256::from(15), "token1 added");
        assert_eq!(report.totals.token2_added, U256::from(7), "token2 added");
        assert_eq!(report.totals.token1_harvested, U256::from(4), "token1 harvested");
        assert_eq!(report.totals.token2_harvested, U256::from(2), "token2 harvested");
        assert_eq!(report.ranges_scanned, 3, "three ranges");
        assert_eq!(report.harvests_counted, 3, "harvests");
        assert!(!report.is_partial(), "no failures");
        assert_eq!(report.blocks_scanned, 29, "latest - start");
    }

    #[tokio::test]
    async fn failed_range_is_skipped_and_only_its_contribution_is_lost() {
        let chain = || {
            MockChain::default()
                .add(RewardSlot::One, 3, 10)
                .add(RewardSlot::One, 15, 20)
                .add(RewardSlot::Two, 16, 8)
                .add(RewardSlot::One, 25, 40)
                .harvest(17, token1(), 6)
                .harvest(28, token2(), 1)
        };

        let full = scan(&chain(), 0, 29, 10).await;
        let failing = chain().fail_range(10);
        let summary = summary(token1(), token2());
        let mut recorder = Recorder::default();
        let partial = Scanner::new(&failing, &summary, ScanConfig::new(0, 10).unwrap())
            .run(29, &mut recorder)
            .await;

        assert_eq!(partial.failed_ranges, [ScanRange::new(10, 19)], "one failure");
        assert_eq!(recorder.failed, [ScanRange::new(10, 19)], "observer told");
        assert_eq!(
            recorder.started.len(),
            3,
            "scan continues after the failure"
        );
        assert_eq!(partial.totals.token1_added, U256::from(50), "10 + 40");
        assert_eq!(
            full.totals.token1_added - partial.totals.token1_added,
            U256::from(20),
            "under-count equals the range's token1 additions"
        );
        assert_eq!(partial.totals.token2_added, U256::ZERO, "range held all token2");
        assert_eq!(partial.totals.token1_harvested, U256::ZERO, "range held the harvest");
        assert_eq!(
            partial.totals.token2_harvested,
            full.totals.token2_harvested,
            "other ranges untouched"
        );
        assert!(
            recorder
                .added
                .iter()
                .all(|e| !matches!(e, RewardEvent::Added { block_number: 10..=19, .. })),
            "events of the failed range are not emitted"
        );
    }

    #[tokio::test]
    async fn unrelated_harvests_are_ignored() {
        let chain = MockChain::default()
            .harvest(1, token1(), 2)
            .harvest(2, Address::repeat_byte(0x99), 5);

        let report = scan(&chain, 0, 10, 50).await;

        assert_eq!(report.totals.token1_harvested, U256::from(2), "matched");
        assert_eq!(report.totals.token2_harvested, U256::ZERO, "no token2");
        assert_eq!(report.harvests_ignored, 1, "unrelated harvest dropped");
    }

    #[tokio::test]
    async fn additions_are_reported_in_order_with_block_time() {
        let chain = MockChain::default()
            .add(RewardSlot::Two, 5, ONE_TOKEN)
            .add(RewardSlot::One, 7, ONE_TOKEN)
            .add(RewardSlot::One, 30, 2 * ONE_TOKEN);

        let summary = summary(token1(), token2());
        let mut recorder = Recorder::default();
        let report = Scanner::new(&chain, &summary, ScanConfig::new(0, 20).unwrap())
            .run(40, &mut recorder)
            .await;

        let blocks: Vec<_> = recorder
            .added
            .iter()
            .filter_map(|e| match e {
                RewardEvent::Added { block_number, .. } => Some(*block_number),
                RewardEvent::Harvested { .. } => None,
            })
            .collect();
        assert_eq!(blocks, [7, 5, 30], "token1 then token2 within a range");
        assert_eq!(recorder.added, report.added, "observer and report agree");
        assert_eq!(
            chain.fetched.borrow().as_slice(),
            [
                ScanRange::new(0, 19),
                ScanRange::new(20, 39),
                ScanRange::new(40, 40)
            ],
            "ranges fetched in increasing order"
        );

        let RewardEvent::Added {
            amount, timestamp, ..
        } = &report.added[0]
        else {
            panic!("expected an addition");
        };
        assert_eq!(format_ether(*amount), "1.0", "1e18 renders as 1.0");
        assert_eq!(*timestamp, GENESIS + 7 * 12, "block timestamp");
    }

    #[tokio::test]
    async fn days_since_start_tracks_last_range_end() {
        let chain = MockChain::default();
        let summary = summary(token1(), token2());
        let report = Scanner::new(&chain, &summary, ScanConfig::new(0, 10).unwrap())
            .run(3_600, &mut ())
            .await;

        // Block 3600 is half a day after genesis; the pool starts a day after genesis.
        let start = summary.settings.start_time;
        let expected = days_between(start, GENESIS + 3_600 * 12);
        assert_eq!(report.days_since_start, Some(expected), "last range end");
        assert!((expected + 0.5).abs() < f64::EPSILON, "half a day before start");
    }

    #[test]
    fn harvest_logs_decode_with_indexed_user() {
        let abi = nitro_pool_abi();
        let event = abi.event("Harvest").unwrap()[0].clone();
        let user = Address::repeat_byte(0xee);
        let token = Address::repeat_byte(0x01);
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Address(token),
            DynSolValue::Uint(U256::from(5), 256),
        ])
        .abi_encode_params();
        let log = Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0xaa),
                data: LogData::new_unchecked(
                    vec![event.selector(), user.into_word()],
                    data.into(),
                ),
            },
            block_number: Some(42),
            ..Log::default()
        };

        let args = event_args(&event, &log).unwrap();
        assert_eq!(address_at(&args, 0, "Harvest").unwrap(), user, "indexed user first");
        assert_eq!(address_at(&args, 1, "Harvest").unwrap(), token, "token second");
        assert_eq!(uint_at(&args, 2, "Harvest").unwrap(), U256::from(5), "amount");
    }

    #[test]
    fn missing_events_are_rejected() {
        let client = FallbackClient::connect(&["http://127.0.0.1:1"]).unwrap();
        let mut abi = nitro_pool_abi();
        abi.events.remove("Harvest");

        let err = NitroPoolEvents::new(&client, Address::ZERO, &abi).unwrap_err();
        assert!(
            matches!(err, Error::MissingAbiItem { kind: "event", .. }),
            "unexpected error: {err}"
        );
        assert!(
            NitroPoolEvents::new(&client, Address::ZERO, &nitro_pool_abi()).is_ok(),
            "full ABI accepted"
        );
    }
}
