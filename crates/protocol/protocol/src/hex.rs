//! Lenient decoding of hex-encoded quantities.
//!
//! Quai RPC responses encode block numbers, gas and timestamps as `0x`-prefixed hex strings.
//! Partial data is preferable to a stalled pipeline, so the `decode_*` helpers map absent or
//! malformed input to zero instead of failing. Callers that need to distinguish the two cases
//! use [`parse_hex_u64`].

use alloy_primitives::U256;
use serde_json::Value;
use thiserror::Error;

/// Error returned when a string is not a valid hex quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input had no digits after the optional `0x` prefix.
    #[error("empty hex quantity")]
    Empty,
    /// The input contained a non-hex character or overflowed the target type.
    #[error("invalid hex quantity: {0}")]
    Invalid(String),
}

/// Parses a hex quantity with an optional `0x` prefix into a `u64`.
pub fn parse_hex_u64(input: &str) -> Result<u64, DecodeError> {
    let digits = strip_prefix(input.trim());
    if digits.is_empty() {
        return Err(DecodeError::Empty);
    }
    u64::from_str_radix(digits, 16).map_err(|_| DecodeError::Invalid(input.to_string()))
}

/// Parses a wei amount. Accepts `0x` hex or plain decimal strings.
pub fn parse_u256(input: &str) -> Result<U256, DecodeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DecodeError::Empty);
    }
    input.parse::<U256>().map_err(|_| DecodeError::Invalid(input.to_string()))
}

/// Decodes an optional hex string, returning `0` for absent or malformed input.
pub fn decode_hex(input: Option<&str>) -> u64 {
    input.and_then(|s| parse_hex_u64(s).ok()).unwrap_or_default()
}

/// Decodes an optional JSON quantity.
///
/// Numbers are taken as-is, strings are parsed as hex. Anything else decodes to `0`.
pub fn decode_hex_value(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => decode_hex(Some(s)),
        _ => 0,
    }
}

/// Encodes a quantity as a `0x`-prefixed hex string without leading zeros.
pub fn encode_hex(value: u64) -> String {
    format!("{value:#x}")
}

fn strip_prefix(input: &str) -> &str {
    input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, 0)]
    #[case(Some("0x2a"), 42)]
    #[case(Some("2a"), 42)]
    #[case(Some("0X2A"), 42)]
    #[case(Some("not-hex"), 0)]
    #[case(Some("0x"), 0)]
    #[case(Some(""), 0)]
    #[case(Some("0x10000000000000000"), 0)]
    fn test_decode_hex(#[case] input: Option<&str>, #[case] expected: u64) {
        assert_eq!(decode_hex(input), expected);
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse_hex_u64("0x"), Err(DecodeError::Empty));
        assert!(matches!(parse_hex_u64("0xzz"), Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn test_decode_hex_value_shapes() {
        assert_eq!(decode_hex_value(Some(&json!("0x5f5e100"))), 100_000_000);
        assert_eq!(decode_hex_value(Some(&json!(17))), 17);
        assert_eq!(decode_hex_value(Some(&json!(null))), 0);
        assert_eq!(decode_hex_value(Some(&json!([1, 2]))), 0);
        assert_eq!(decode_hex_value(None), 0);
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(0), "0x0");
        assert_eq!(encode_hex(6_210_000), "0x5ec1d0");
        assert_eq!(parse_hex_u64(&encode_hex(u64::MAX)), Ok(u64::MAX));
    }

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("0xde0b6b3a7640000").unwrap(), U256::from(10u64.pow(18)));
        assert_eq!(parse_u256("1000000000").unwrap(), U256::from(1_000_000_000u64));
        assert!(parse_u256("").is_err());
        assert!(parse_u256("ten").is_err());
    }
}
