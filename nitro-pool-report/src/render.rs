//! Console output: boxed tables, reward lines and the scan status line.

use std::io::{self, Write};

use nitro_pool::Error;
use nitro_pool::scan::{ScanObserver, ScanReport};
use nitro_pool::types::{PoolSummary, RewardEvent, RewardSlot, RunningTotals, ScanRange};
use nitro_pool::units::{as_days, days_between, format_ether, format_timestamp};
use tabled::builder::Builder;
use tabled::settings::Style;

/// A two-column table row.
pub type Row = [String; 2];

const NOT_APPLICABLE: &str = "N/A";

/// Render `rows` as a boxed two-column table.
#[must_use]
pub fn render_table(rows: &[Row]) -> String {
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row.clone());
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

fn timestamp_or_na(seconds: u64) -> String {
    if seconds > 0 {
        format_timestamp(seconds)
    } else {
        NOT_APPLICABLE.to_owned()
    }
}

fn after_start(summary: &PoolSummary, time: u64) -> String {
    format!(
        "{} (After {} days of StartTime)",
        format_timestamp(time),
        days_between(summary.settings.start_time, time)
    )
}

/// Rows of the pool configuration table.
#[must_use]
pub fn config_rows(summary: &PoolSummary) -> Vec<Row> {
    let settings = &summary.settings;
    let pair = summary.pair_label();
    let token = |slot| {
        let token = summary.reward_token(slot);
        format!("{} ({})", token.symbol, token.address)
    };

    let mut rows = vec![
        ["NitroPool".to_owned(), summary.pool.to_string()],
        ["NFTPool".to_owned(), summary.nft_pool.to_string()],
        ["LPToken".to_owned(), format!("{pair} ({})", summary.lp_token)],
        ["RewardsToken1".to_owned(), token(RewardSlot::One)],
        ["RewardsToken2".to_owned(), token(RewardSlot::Two)],
        ["Created On".to_owned(), format_timestamp(summary.creation_time)],
        ["Published On".to_owned(), format_timestamp(summary.publish_time)],
        ["StartTime".to_owned(), format_timestamp(settings.start_time)],
        [
            "Harvest StartTime".to_owned(),
            format_timestamp(settings.harvest_start_time),
        ],
        [
            "Deposit EndTime".to_owned(),
            after_start(summary, settings.deposit_end_time),
        ],
        ["EndTime".to_owned(), after_start(summary, settings.end_time)],
        [
            "Minimum Days spNFT to be locked".to_owned(),
            if settings.lock_duration_req > 0 {
                as_days(settings.lock_duration_req).to_string()
            } else {
                NOT_APPLICABLE.to_owned()
            },
        ],
        [
            "spNFT should be locked at least until".to_owned(),
            timestamp_or_na(settings.lock_end_req),
        ],
        [
            format!("Minimum {pair} deposit required in the spNFT"),
            if settings.deposit_amount_req.is_zero() {
                NOT_APPLICABLE.to_owned()
            } else {
                format_ether(settings.deposit_amount_req)
            },
        ],
        [
            "Whitelisting requirement for deposits".to_owned(),
            if settings.whitelist {
                "Required".to_owned()
            } else {
                NOT_APPLICABLE.to_owned()
            },
        ],
    ];
    if !settings.description.is_empty() {
        rows.push(["Description".to_owned(), settings.description.clone()]);
    }
    rows
}

/// Rows of the final totals table.
///
/// Skipped ranges are listed because their events are missing from the
/// totals.
#[must_use]
pub fn summary_rows(summary: &PoolSummary, report: &ScanReport) -> Vec<Row> {
    let mut rows = Vec::with_capacity(5);
    for slot in RewardSlot::BOTH {
        let symbol = &summary.reward_token(slot).symbol;
        rows.push([
            format!("Total {symbol} ADDED"),
            format_ether(report.totals.added(slot)),
        ]);
        rows.push([
            format!("Total {symbol} HARVESTED"),
            format_ether(report.totals.harvested(slot)),
        ]);
    }
    if report.is_partial() {
        let ranges: Vec<_> = report.failed_ranges.iter().map(ToString::to_string).collect();
        rows.push([
            "Skipped ranges (totals under-count)".to_owned(),
            ranges.join(", "),
        ]);
    }
    rows
}

/// Progress text shown while `range` is being scanned.
#[must_use]
pub fn status_text(
    summary: &PoolSummary,
    range: ScanRange,
    totals: &RunningTotals,
    days_since_start: Option<f64>,
) -> String {
    let harvested = |slot| {
        format!(
            "{}% {} Harvested",
            totals.harvested_percent(slot).unwrap_or(0.0),
            summary.reward_token(slot).symbol
        )
    };
    let days = days_since_start.unwrap_or(0.0);
    let timing = if days > 0.0 {
        format!("{} days since StartTime", days.floor())
    } else {
        format!("{} days to StartTime", (-days).floor())
    };

    format!(
        "Scanning block {} to {} | {} | {} | {timing}",
        range.from_block,
        range.to_block,
        harvested(RewardSlot::One),
        harvested(RewardSlot::Two),
    )
}

/// `<amount> <symbol> ADDED on <date>` for an addition; `None` otherwise.
#[must_use]
pub fn added_line(summary: &PoolSummary, event: &RewardEvent) -> Option<String> {
    match event {
        RewardEvent::Added {
            slot,
            amount,
            timestamp,
            ..
        } => Some(format!(
            "{} {} ADDED on {}",
            format_ether(*amount),
            summary.reward_token(*slot).symbol,
            format_timestamp(*timestamp)
        )),
        RewardEvent::Harvested { .. } => None,
    }
}

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const CLEAR_LINE: &str = "\r\x1b[2K";

/// A single status line redrawn in place.
#[derive(Debug)]
pub struct StatusLine<W> {
    out: W,
    frame: usize,
    visible: bool,
}

impl<W: Write> StatusLine<W> {
    /// Draw status updates to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            frame: 0,
            visible: false,
        }
    }

    /// Replace the status text.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn set(&mut self, text: &str) -> io::Result<()> {
        let frame = SPINNER.get(self.frame % SPINNER.len()).unwrap_or(&" ");
        self.frame = self.frame.wrapping_add(1);
        write!(self.out, "{CLEAR_LINE}{frame} {text}")?;
        self.visible = true;
        self.out.flush()
    }

    /// Erase the status line so other output can be printed.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn clear(&mut self) -> io::Result<()> {
        if self.visible {
            write!(self.out, "{CLEAR_LINE}")?;
            self.visible = false;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Replace the status with a permanent success line.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn succeed(&mut self, text: &str) -> io::Result<()> {
        self.finish('✔', text)
    }

    /// Replace the status with a permanent failure line.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn fail(&mut self, text: &str) -> io::Result<()> {
        self.finish('✖', text)
    }

    fn finish(&mut self, symbol: char, text: &str) -> io::Result<()> {
        self.clear()?;
        writeln!(self.out, "{symbol} {text}")?;
        self.out.flush()
    }
}

/// [`ScanObserver`] printing reward lines to `out` and progress to `status`.
#[derive(Debug)]
pub struct ConsoleObserver<'a, O, S> {
    summary: &'a PoolSummary,
    out: O,
    status: StatusLine<S>,
}

impl<'a> ConsoleObserver<'a, io::Stdout, io::Stderr> {
    /// Reward lines on stdout, status on stderr.
    #[must_use]
    pub fn stdio(summary: &'a PoolSummary) -> Self {
        Self::new(summary, io::stdout(), io::stderr())
    }
}

impl<'a, O: Write, S: Write> ConsoleObserver<'a, O, S> {
    /// Observe a scan of `summary`'s pool.
    pub const fn new(summary: &'a PoolSummary, out: O, status: S) -> Self {
        Self {
            summary,
            out,
            status: StatusLine::new(status),
        }
    }

    /// Print the closing status line.
    ///
    /// # Errors
    ///
    /// Returns any write error.
    pub fn finish(&mut self, report: &ScanReport) -> io::Result<()> {
        let text = format!("Finished querying {} blocks", report.blocks_scanned);
        if report.is_partial() {
            self.status.fail(&format!(
                "{text} ({} range(s) skipped)",
                report.failed_ranges.len()
            ))
        } else {
            self.status.succeed(&text)
        }
    }

    /// Consume the observer, returning its writers.
    #[must_use]
    pub fn into_inner(self) -> (O, S) {
        (self.out, self.status.out)
    }

    fn print_added(&mut self, event: &RewardEvent) -> io::Result<()> {
        if let Some(line) = added_line(self.summary, event) {
            self.status.clear()?;
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

fn log_write_error(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "console write failed");
    }
}

impl<O: Write, S: Write> ScanObserver for ConsoleObserver<'_, O, S> {
    fn range_started(
        &mut self,
        range: ScanRange,
        totals: &RunningTotals,
        days_since_start: Option<f64>,
    ) {
        let text = status_text(self.summary, range, totals, days_since_start);
        log_write_error(self.status.set(&text));
    }

    fn reward_added(&mut self, event: &RewardEvent) {
        log_write_error(self.print_added(event));
    }

    fn range_failed(&mut self, range: ScanRange, _error: &Error) {
        log_write_error(self.status.fail(&format!(
            "Failed between block {} to {}",
            range.from_block, range.to_block
        )));
    }
}
