//! Display conversions for token amounts and block timestamps.

use alloy::primitives::{U256, utils};
use chrono::DateTime;

use crate::error::Result;

/// Decimals of every NitroPool reward and LP token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Timestamp layout used in all output.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Render `amount` with `decimals` fractional digits, trimming trailing
/// zeros but always keeping one fractional digit (`1.0`, `0.25`).
///
/// # Errors
///
/// Returns [`Error::Units`] if `decimals` exceeds what a `U256` can scale.
pub fn format_units(amount: U256, decimals: u8) -> Result<String> {
    Ok(trim_fraction(&utils::format_units(amount, decimals)?))
}

/// [`format_units`] with 18 decimals.
#[must_use]
pub fn format_ether(amount: U256) -> String {
    trim_fraction(&utils::format_ether(amount))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            let fraction = if fraction.is_empty() { "0" } else { fraction };
            format!("{whole}.{fraction}")
        }
        None => format!("{formatted}.0"),
    }
}

/// Format a unix timestamp (seconds) as `YYYY/MM/DD HH:MM` in UTC.
#[must_use]
pub fn format_timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map_or_else(|| seconds.to_string(), |t| t.format(TIMESTAMP_FORMAT).to_string())
}

/// Signed number of days from `from` to `to` (unix seconds).
#[must_use]
pub fn days_between(from: u64, to: u64) -> f64 {
    let delta = i128::from(to) - i128::from(from);
    delta as f64 / SECONDS_PER_DAY
}

/// A duration in seconds expressed in days.
#[must_use]
pub fn as_days(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_DAY
}
