//! Claim store capability.

use async_trait::async_trait;
use thiserror::Error;

use spigot_common::{Address, ClaimRecord, Timestamp};

/// Errors from the claim store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the write failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No record exists for the address.
    #[error("no claim record for {0}")]
    NotFound(Address),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The record was created or flipped to claimed by this call.
    Reserved,
    /// The record was already claimed; nothing was written.
    AlreadyClaimed,
}

/// Durable mapping from address to claim state.
///
/// `reserve` must be atomic per address: of two concurrent calls for the
/// same fresh address, exactly one observes `Reserved`. Implementations
/// push this guarantee into their backing store rather than in-process
/// locks.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Read the record for an address.
    async fn get(&self, address: &Address) -> StoreResult<Option<ClaimRecord>>;

    /// Atomically mark the address claimed iff its record is absent or
    /// unclaimed.
    async fn reserve(&self, address: &Address, at: Timestamp) -> StoreResult<Reservation>;

    /// Revert a reservation: `claimed = false`, `claimed_at` cleared.
    /// Fails with [`StoreError::NotFound`] if no record exists.
    async fn release(&self, address: &Address) -> StoreResult<()>;
}
