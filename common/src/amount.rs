//! Token amount type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token amount in on-chain base units.
///
/// The faucet dispenses a fixed integer number of base units per claim;
/// decimal placement is a property of the asset, not of this type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u64);

impl TokenAmount {
    /// Create an amount from base units.
    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    /// Get the amount in base units.
    pub fn base_units(&self) -> u64 {
        self.0
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
