//! Formatting of chain quantities for export.

use alloy::primitives::U256;
use chrono::DateTime;
use rust_decimal::Decimal;

const WEI_DECIMALS: u32 = 18;
const BALANCE_DECIMALS: u32 = 6;

/// Render a wei amount as ether with six fractional digits.
///
/// Rounds half to even on the sixth digit.
pub fn format_ether(wei: U256) -> anyhow::Result<String> {
    let wei = u128::try_from(wei)
        .ok()
        .and_then(|w| i128::try_from(w).ok())
        .ok_or_else(|| anyhow::anyhow!("Balance {} wei is out of range", wei))?;
    let ether = Decimal::try_from_i128_with_scale(wei, WEI_DECIMALS)
        .map_err(|e| anyhow::anyhow!("Balance {} wei is out of range: {}", wei, e))?;
    Ok(format!(
        "{:.prec$}",
        ether.round_dp(BALANCE_DECIMALS),
        prec = BALANCE_DECIMALS as usize
    ))
}

/// Render a unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(unix_seconds: u64) -> anyhow::Result<String> {
    let seconds = i64::try_from(unix_seconds)?;
    let datetime = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid timestamp {}", unix_seconds))?;
    Ok(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}
