//! Claim record model and claim outcomes.

use serde::{Deserialize, Serialize};

use crate::{Address, Timestamp, TokenAmount, TxHash};

/// Durable claim state for one address. At most one record exists per
/// address; the record is never deleted.
///
/// A record with `claimed = true` and a transfer still in flight is the
/// transient reserved state: it either stays claimed (transfer
/// succeeded) or is reverted to unclaimed (transfer failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// The address this record belongs to.
    pub address: Address,
    /// True iff a claim is currently considered granted.
    pub claimed: bool,
    /// Set when `claimed` becomes true, cleared when reverted.
    pub claimed_at: Option<Timestamp>,
}

impl ClaimRecord {
    /// Create a record reserving a claim for an address.
    pub fn reserved(address: Address, at: Timestamp) -> Self {
        Self {
            address,
            claimed: true,
            claimed_at: Some(at),
        }
    }

    /// Revert the record to unclaimed, restoring eligibility.
    pub fn revert(&mut self) {
        self.claimed = false;
        self.claimed_at = None;
    }
}

/// Outcome of a granted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Identifier of the submitted transfer.
    pub tx_hash: TxHash,
    /// Amount that was dispensed, in base units.
    pub amount: TokenAmount,
}
