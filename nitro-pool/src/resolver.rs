//! One-time resolution of everything needed to label a pool report.
//!
//! Reads are strictly sequential. The first failure aborts resolution; a
//! partially resolved pool is never returned.

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, U256};

use crate::abi::AbiSource;
use crate::client::FallbackClient;
use crate::error::{Error, Result};
use crate::types::{PoolSettings, PoolSummary, TokenInfo};

/// A resolved pool: its summary plus the ABI used to decode its events.
#[derive(Debug, Clone)]
pub struct ResolvedPool {
    /// Immutable pool snapshot.
    pub summary: PoolSummary,
    /// The pool contract ABI.
    pub abi: JsonAbi,
}

/// Resolve the configuration of the NitroPool at `pool`.
///
/// # Errors
///
/// Returns the first ABI fetch, RPC, or output-shape error encountered.
pub async fn resolve<A: AbiSource>(
    client: &FallbackClient,
    abis: &A,
    pool: Address,
) -> Result<ResolvedPool> {
    tracing::info!(%pool, "resolving pool configuration");
    let pool_abi = abis.fetch_abi(pool).await?;

    let rewards_token1 = token_at(client, &pool_abi, pool, "rewardsToken1").await?;
    let rewards_token2 = token_at(client, &pool_abi, pool, "rewardsToken2").await?;

    let nft_pool = address_at(&client.call(pool, &pool_abi, "nftPool").await?, 0, "nftPool")?;
    let nft_pool_abi = abis.fetch_abi(nft_pool).await?;
    let pool_info = flatten(client.call(nft_pool, &nft_pool_abi, "getPoolInfo").await?);
    let lp_token = address_at(&pool_info, 0, "getPoolInfo")?;
    tracing::debug!(%nft_pool, %lp_token, "resolved NFT pool");

    let lp_abi = abis.fetch_abi(lp_token).await?;
    let token0 = token_at(client, &lp_abi, lp_token, "token0").await?;
    let token1 = token_at(client, &lp_abi, lp_token, "token1").await?;

    let creation_time = timestamp(client, &pool_abi, pool, "creationTime").await?;
    let settings = settings_from(client.call(pool, &pool_abi, "settings").await?)?;
    let publish_time = timestamp(client, &pool_abi, pool, "publishTime").await?;

    let summary = PoolSummary {
        pool,
        nft_pool,
        lp_token,
        pair: (token0, token1),
        rewards_token1,
        rewards_token2,
        creation_time,
        publish_time,
        settings,
    };
    tracing::info!(
        %pool,
        pair = %summary.pair_label(),
        token1 = %summary.rewards_token1.symbol,
        token2 = %summary.rewards_token2.symbol,
        "pool resolved"
    );

    Ok(ResolvedPool {
        summary,
        abi: pool_abi,
    })
}

/// Read a token address from the first output of `function`, then its symbol.
async fn token_at(
    client: &FallbackClient,
    abi: &JsonAbi,
    contract: Address,
    function: &'static str,
) -> Result<TokenInfo> {
    let values = flatten(client.call(contract, abi, function).await?);
    let address = address_at(&values, 0, function)?;
    let symbol = client.symbol(address).await?;
    Ok(TokenInfo { address, symbol })
}

async fn timestamp(
    client: &FallbackClient,
    abi: &JsonAbi,
    pool: Address,
    function: &'static str,
) -> Result<u64> {
    let values = client.call(pool, abi, function).await?;
    u64_at(&values, 0, function)
}

/// Struct getters may return their fields flat or as one tuple; accept both.
pub(crate) fn flatten(values: Vec<DynSolValue>) -> Vec<DynSolValue> {
    match <[DynSolValue; 1]>::try_from(values) {
        Ok([DynSolValue::Tuple(fields)]) => fields,
        Ok([value]) => vec![value],
        Err(values) => values,
    }
}

fn value_at<'a>(values: &'a [DynSolValue], index: usize, call: &str) -> Result<&'a DynSolValue> {
    values
        .get(index)
        .ok_or_else(|| Error::unexpected(call, format!("missing output #{index}")))
}

pub(crate) fn address_at(values: &[DynSolValue], index: usize, call: &str) -> Result<Address> {
    value_at(values, index, call)?
        .as_address()
        .ok_or_else(|| Error::unexpected(call, format!("output #{index} is not an address")))
}

pub(crate) fn uint_at(values: &[DynSolValue], index: usize, call: &str) -> Result<U256> {
    value_at(values, index, call)?
        .as_uint()
        .map(|(value, _bits)| value)
        .ok_or_else(|| Error::unexpected(call, format!("output #{index} is not a uint")))
}

fn u64_at(values: &[DynSolValue], index: usize, call: &str) -> Result<u64> {
    let value = uint_at(values, index, call)?;
    u64::try_from(value)
        .map_err(|_| Error::unexpected(call, format!("output #{index} ({value}) exceeds u64")))
}

fn bool_at(values: &[DynSolValue], index: usize, call: &str) -> Result<bool> {
    value_at(values, index, call)?
        .as_bool()
        .ok_or_else(|| Error::unexpected(call, format!("output #{index} is not a bool")))
}

fn string_at(values: &[DynSolValue], index: usize, call: &str) -> Result<String> {
    value_at(values, index, call)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::unexpected(call, format!("output #{index} is not a string")))
}

/// Decode the `settings()` record.
pub(crate) fn settings_from(values: Vec<DynSolValue>) -> Result<PoolSettings> {
    const CALL: &str = "settings";
    let values = flatten(values);
    Ok(PoolSettings {
        start_time: u64_at(&values, 0, CALL)?,
        end_time: u64_at(&values, 1, CALL)?,
        harvest_start_time: u64_at(&values, 2, CALL)?,
        deposit_end_time: u64_at(&values, 3, CALL)?,
        lock_duration_req: u64_at(&values, 4, CALL)?,
        lock_end_req: u64_at(&values, 5, CALL)?,
        deposit_amount_req: uint_at(&values, 6, CALL)?,
        whitelist: bool_at(&values, 7, CALL)?,
        description: string_at(&values, 8, CALL)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(v: u64) -> DynSolValue {
        DynSolValue::Uint(U256::from(v), 256)
    }

    fn settings_values() -> Vec<DynSolValue> {
        vec![
            uint(1_700_086_400),
            uint(1_702_678_400),
            uint(1_700_086_400),
            uint(1_700_691_200),
            uint(86_400 * 30),
            uint(0),
            uint(1_000_000_000_000_000_000),
            DynSolValue::Bool(true),
            DynSolValue::String("GRAIL incentives".into()),
        ]
    }

    #[test]
    fn settings_decode_from_flat_outputs() {
        let settings = settings_from(settings_values()).unwrap();
        assert_eq!(settings.start_time, 1_700_086_400, "start");
        assert_eq!(settings.lock_duration_req, 2_592_000, "lock duration");
        assert_eq!(
            settings.deposit_amount_req,
            U256::from(1_000_000_000_000_000_000_u64),
            "deposit requirement"
        );
        assert!(settings.whitelist, "whitelist");
        assert_eq!(settings.description, "GRAIL incentives", "description");
    }

    #[test]
    fn settings_decode_from_single_tuple() {
        let wrapped = vec![DynSolValue::Tuple(settings_values())];
        assert_eq!(
            settings_from(wrapped).unwrap(),
            settings_from(settings_values()).unwrap(),
            "tuple and flat outputs agree"
        );
    }

    #[test]
    fn short_settings_are_rejected() {
        let mut values = settings_values();
        values.truncate(5);
        let err = settings_from(values).unwrap_err();
        assert!(
            err.to_string().contains("missing output #5"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn reward_token_address_is_first_field() {
        let token = Address::repeat_byte(0x3d);
        let outputs = vec![
            DynSolValue::Address(token),
            uint(10),
            uint(5),
            uint(1),
        ];
        let values = flatten(outputs);
        assert_eq!(address_at(&values, 0, "rewardsToken1").unwrap(), token, "token");
        assert!(address_at(&values, 1, "rewardsToken1").is_err(), "uint is not an address");
    }

    #[test]
    fn oversized_timestamps_are_rejected() {
        let values = vec![DynSolValue::Uint(U256::MAX, 256)];
        assert!(u64_at(&values, 0, "creationTime").is_err(), "overflow");
    }

    #[test]
    fn empty_outputs_are_rejected() {
        assert!(address_at(&[], 0, "nftPool").is_err(), "no outputs");
    }
}
