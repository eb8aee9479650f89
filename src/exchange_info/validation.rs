//! Input normalisation and validation for catalog keys
//!
//! - on-chain addresses are normalised to their EIP-55 checksum form
//! - user supplied prefixes are escaped before being used in `ILIKE`
//! - literals that end up inside time-series statements go through
//!   [`SeriesLiteral`], whose field is private to force validation

use alloy_primitives::Address;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Validation Errors
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Invalid length for {field}: expected {min}-{max}, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid format for {field}: '{value}' (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Reject empty (or whitespace-only) key components
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

// ============================================================================
// Addresses
// ============================================================================

/// Normalise an address to the canonical on-chain hex form.
///
/// Hex strings of up to 20 bytes (with or without `0x`) are left-padded and
/// rendered with the EIP-55 checksum, so `0xabc` and `0x0000…0ABC` compare
/// equal. Anything else (base58, bech32, empty fiat addresses) is returned
/// trimmed but otherwise untouched.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.is_empty() || hex.len() > 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return trimmed.to_string();
    }

    match Address::from_str(&format!("0x{:0>40}", hex)) {
        Ok(parsed) => parsed.to_checksum(None),
        Err(_) => trimmed.to_string(),
    }
}

// ============================================================================
// ILIKE prefixes
// ============================================================================

/// Build a case-insensitive prefix pattern for `ILIKE`.
///
/// `%`, `_` and `\` in the prefix match literally.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// SeriesLiteral - validated literal for time-series statements
// ============================================================================

/// String value safe to embed in a quoted time-series literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesLiteral(String);

impl SeriesLiteral {
    /// # Validation Rules
    /// - Length: 0-128 characters (empty is a valid tag value)
    /// - Characters: ASCII letters, digits, `_`, `-`, `.`, `:` and space
    pub fn new(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        if value.len() > 128 {
            return Err(ValidationError::InvalidLength {
                field,
                min: 0,
                max: 128,
                actual: value.len(),
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | ' '))
        {
            return Err(ValidationError::InvalidFormat {
                field,
                value: value.to_string(),
                expected: "letters, digits, '_', '-', '.', ':' or space",
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_checksums_lowercase_hex() {
        assert_eq!(
            normalize_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045"),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn test_normalize_address_is_case_insensitive() {
        let upper = normalize_address("0XD8DA6BF26964AF9D7EED9E03E53415D37AA96045");
        let mixed = normalize_address("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        assert_eq!(upper, mixed);
        assert!(upper.starts_with("0x"));
    }

    #[test]
    fn test_normalize_address_pads_short_hex() {
        let normalized = normalize_address("0xabc");
        assert_eq!(normalized.len(), 42);
        assert!(normalized.to_lowercase().ends_with("0abc"));
        assert_eq!(normalized, normalize_address("0x0000000000000000000000000000000000000ABC"));
    }

    #[test]
    fn test_normalize_address_leaves_non_hex_untouched() {
        let solana = "So11111111111111111111111111111111111111112";
        assert_eq!(normalize_address(solana), solana);
        assert_eq!(normalize_address("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh"),
            "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh");
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address("  0x  "), "0x");
    }

    #[test]
    fn test_prefix_pattern_appends_wildcard() {
        assert_eq!(prefix_pattern("btc"), "btc%");
        assert_eq!(prefix_pattern(""), "%");
    }

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("%"), "\\%%");
        assert_eq!(prefix_pattern("A_B"), "A\\_B%");
        assert_eq!(prefix_pattern("x\\y"), "x\\\\y%");
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("exchange", "Binance"), Ok("Binance"));
        assert_eq!(
            require_non_empty("exchange", "  "),
            Err(ValidationError::Empty { field: "exchange" })
        );
    }

    #[test]
    fn test_series_literal_valid() {
        assert!(SeriesLiteral::new("exchange", "").is_ok());
        assert!(SeriesLiteral::new("blockchain", "Ethereum").is_ok());
        assert!(SeriesLiteral::new("address", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_ok());
        assert_eq!(SeriesLiteral::new("filter", "VOL120").unwrap().as_str(), "VOL120");
    }

    #[test]
    fn test_series_literal_rejects_quotes() {
        let err = SeriesLiteral::new("address", "x' OR '1'='1").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_series_literal_rejects_long_values() {
        let err = SeriesLiteral::new("address", &"a".repeat(129)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLength { .. }));
    }
}
