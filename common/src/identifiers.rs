//! Identifier types for faucet entities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FaucetError, Result};

/// Longest address form: 32 bytes of account data, hex encoded.
const MAX_ADDRESS_HEX_DIGITS: usize = 64;

/// A recipient account address.
///
/// Addresses are `0x`-prefixed hex strings of up to 64 digits. Parsing
/// normalizes to lowercase so the same account in different spellings
/// maps to a single claim record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address from caller input.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FaucetError::InvalidAddress("address is empty".to_string()));
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| {
                FaucetError::InvalidAddress("address must start with 0x".to_string())
            })?;

        if digits.is_empty() {
            return Err(FaucetError::InvalidAddress(
                "address has no digits after 0x".to_string(),
            ));
        }

        if digits.len() > MAX_ADDRESS_HEX_DIGITS {
            return Err(FaucetError::InvalidAddress(format!(
                "address exceeds {} hex digits",
                MAX_ADDRESS_HEX_DIGITS
            )));
        }

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FaucetError::InvalidAddress(
                "address contains non-hex characters".to_string(),
            ));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Get the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transaction identifier returned by the transfer executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    /// Create a new transaction hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The asset dispensed by the faucet, as an on-chain coin type of the
/// form `<address>::<module>::<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Parse a coin type string.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split("::").collect();
        if parts.len() != 3 {
            return Err(FaucetError::ConfigurationError(format!(
                "asset must have the form <address>::<module>::<name>, got {:?}",
                input
            )));
        }

        Address::parse(parts[0]).map_err(|_| {
            FaucetError::ConfigurationError(format!(
                "asset address segment is not a valid address: {:?}",
                parts[0]
            ))
        })?;

        for segment in &parts[1..] {
            let valid = !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(FaucetError::ConfigurationError(format!(
                    "asset segment is not a valid identifier: {:?}",
                    segment
                )));
            }
        }

        Ok(Self(input.to_string()))
    }

    /// Get the coin type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_address_parse_normalizes_case() {
        let a = Address::parse("0xAbC123").unwrap();
        let b = Address::parse("0xabc123").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xabc123");
    }

    #[test]
    fn test_address_parse_accepts_upper_prefix() {
        let a = Address::parse("0XFF").unwrap();
        assert_eq!(a.as_str(), "0xff");
    }

    #[test]
    fn test_address_parse_trims_whitespace() {
        let a = Address::parse("  0x1  ").unwrap();
        assert_eq!(a.as_str(), "0x1");
    }

    #[test]
    fn test_address_parse_rejects_malformed() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("   ").is_err());
        assert!(Address::parse("0x").is_err());
        assert!(Address::parse("abc123").is_err());
        assert!(Address::parse("0xg1").is_err());
        assert!(Address::parse(&format!("0x{}", "a".repeat(65))).is_err());
    }

    #[test]
    fn test_asset_parse() {
        let asset = AssetId::parse("0x1::boson::Boson").unwrap();
        assert_eq!(asset.as_str(), "0x1::boson::Boson");

        assert!(AssetId::parse("0x1::boson").is_err());
        assert!(AssetId::parse("boson::boson::Boson").is_err());
        assert!(AssetId::parse("0x1::bo-son::Boson").is_err());
        assert!(AssetId::parse("0x1::::Boson").is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_hex_parses(digits in "[0-9a-fA-F]{1,64}") {
            let parsed = Address::parse(&format!("0x{}", digits)).unwrap();
            prop_assert_eq!(parsed.as_str(), format!("0x{}", digits.to_lowercase()));
        }

        #[test]
        fn prop_non_hex_rejected(digits in "[g-z!@# ]{1,16}") {
            prop_assert!(Address::parse(&format!("0x{}", digits)).is_err(), "expected parse error");
        }
    }
}
