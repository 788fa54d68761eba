//! Satoshi amount formatting
//!
//! Amounts are formatted with integer arithmetic so large values never pick
//! up floating-point rounding.

/// Satoshis per Bitcoin
const SATS_PER_BTC: u64 = 100_000_000;

/// Format a satoshi amount as BTC with exactly 8 decimals
///
/// # Examples
/// ```
/// use stamp_decoder::utils::currency::format_btc;
///
/// assert_eq!(format_btc(7800), "0.00007800");
/// assert_eq!(format_btc(28125351850), "281.25351850");
/// ```
pub fn format_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// Format a satoshi amount as dual BTC + sats display
///
/// # Examples
/// ```
/// use stamp_decoder::utils::currency::format_sats_as_btc;
///
/// assert_eq!(format_sats_as_btc(5471), "0.00005471 BTC (5471 sats)");
/// ```
pub fn format_sats_as_btc(sats: u64) -> String {
    format!("{} BTC ({} sats)", format_btc(sats), sats)
}
