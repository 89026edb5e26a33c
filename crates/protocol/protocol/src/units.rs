//! Unit conversions and display helpers for amounts and hashes.

use alloy_primitives::U256;

const WEI_PER_GWEI: f64 = 1e9;

/// Converts a wei amount into gwei.
pub fn wei_to_gwei(wei: U256) -> f64 {
    f64::from(wei) / WEI_PER_GWEI
}

/// Converts a wei amount into whole QUAI, keeping four decimals.
///
/// The amount is first truncated to units of `1e14` wei with integer arithmetic, so large
/// balances keep their precision up to the fourth decimal.
pub fn wei_to_quai(wei: U256) -> f64 {
    let ten_thousandths = wei / U256::from(100_000_000_000_000u64);
    f64::from(ten_thousandths) / 10_000.0
}

/// Shortens a hash to `0x` plus `chars` leading characters and `chars` trailing characters.
///
/// Hashes too short to shorten are returned unchanged.
pub fn truncate_hash(hash: &str, chars: usize) -> String {
    if hash.len() <= chars * 2 + 2 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..chars + 2], &hash[hash.len() - chars..])
}
