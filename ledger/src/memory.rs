//! In-memory claim store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use spigot_common::{Address, ClaimRecord, Timestamp};

use crate::store::{ClaimStore, Reservation, StoreError, StoreResult};

/// Claim store backed by a concurrent in-process map.
///
/// The map's per-key entry lock makes `reserve` atomic. Records do not
/// survive a restart; `faucetd` falls back to this store when no
/// database is configured, and tests use it as the real-atomicity store.
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    records: DashMap<Address, ClaimRecord>,
}

impl MemoryClaimStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn get(&self, address: &Address) -> StoreResult<Option<ClaimRecord>> {
        Ok(self.records.get(address).map(|record| record.clone()))
    }

    async fn reserve(&self, address: &Address, at: Timestamp) -> StoreResult<Reservation> {
        match self.records.entry(address.clone()) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.claimed {
                    return Ok(Reservation::AlreadyClaimed);
                }
                record.claimed = true;
                record.claimed_at = Some(at);
                Ok(Reservation::Reserved)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(ClaimRecord::reserved(address.clone(), at));
                Ok(Reservation::Reserved)
            }
        }
    }

    async fn release(&self, address: &Address) -> StoreResult<()> {
        match self.records.get_mut(address) {
            Some(mut record) => {
                record.revert();
                Ok(())
            }
            None => Err(StoreError::NotFound(address.clone())),
        }
    }
}
