//! Core claim coordinator implementation.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use spigot_common::{now, Address, AssetId, ClaimReceipt, FaucetError, Result, TokenAmount};
use spigot_ledger::{ClaimStore, Reservation};
use spigot_transfer::{TransferExecutor, TransferRequest};

use crate::metrics::FaucetMetrics;

/// Orchestrates the claim-check, reservation, transfer, and reconcile
/// sequence.
///
/// Per address the record moves `unclaimed -> reserved -> claimed` on
/// success, or back to `unclaimed` when the transfer fails. The
/// reserved state is internal: callers only ever observe success,
/// `AlreadyClaimed`, or a failure after compensation. All mutual
/// exclusion between concurrent requests lives in the store's atomic
/// `reserve`; the coordinator itself keeps no per-address state, so it
/// can be scaled horizontally.
pub struct ClaimCoordinator {
    /// Claim record store.
    store: Arc<dyn ClaimStore>,
    /// Chain-facing transfer executor.
    executor: Arc<dyn TransferExecutor>,
    /// Fixed amount dispensed per claim.
    amount: TokenAmount,
    /// Asset dispensed per claim.
    asset: AssetId,
    /// Outcome counters.
    metrics: Arc<FaucetMetrics>,
}

impl ClaimCoordinator {
    /// Create a new coordinator. Amount and asset come from
    /// configuration resolved at startup; requests only supply the
    /// recipient.
    pub fn new(
        store: Arc<dyn ClaimStore>,
        executor: Arc<dyn TransferExecutor>,
        amount: TokenAmount,
        asset: AssetId,
    ) -> Self {
        Self {
            store,
            executor,
            amount,
            asset,
            metrics: Arc::new(FaucetMetrics::new()),
        }
    }

    /// Get the coordinator's metrics.
    pub fn metrics(&self) -> &FaucetMetrics {
        &self.metrics
    }

    /// Grant at most one claim to `raw_address`.
    ///
    /// The record is flipped to claimed *before* the transfer is
    /// attempted, so a concurrent duplicate request loses the
    /// reservation instead of triggering a second transfer. A failed
    /// transfer reverts the record, restoring eligibility for a retry;
    /// the coordinator itself never retries.
    #[instrument(skip(self))]
    pub async fn claim(&self, raw_address: &str) -> Result<ClaimReceipt> {
        self.metrics.claim_started();

        let address = match Address::parse(raw_address) {
            Ok(address) => address,
            Err(e) => {
                self.metrics.claim_rejected();
                return Err(e);
            }
        };

        match self.store.reserve(&address, now()).await {
            Ok(Reservation::Reserved) => {}
            Ok(Reservation::AlreadyClaimed) => {
                info!(address = %address, "Claim rejected, address has already claimed");
                self.metrics.claim_rejected();
                return Err(FaucetError::AlreadyClaimed(address));
            }
            Err(e) => {
                // Nothing was written; no compensation needed.
                warn!(address = %address, error = %e, "Store unavailable before reservation");
                self.metrics.claim_failed();
                return Err(FaucetError::StoreUnavailable(e.to_string()));
            }
        }

        let request = TransferRequest {
            recipient: address.clone(),
            amount: self.amount,
            asset: self.asset.clone(),
        };

        match self.executor.transfer(&request).await {
            Ok(tx_hash) => {
                info!(
                    address = %address,
                    tx_hash = %tx_hash,
                    amount = %self.amount,
                    executor = self.executor.name(),
                    "Claim granted"
                );
                self.metrics.claim_granted();
                Ok(ClaimReceipt {
                    tx_hash,
                    amount: self.amount,
                })
            }
            Err(transfer_error) => {
                warn!(
                    address = %address,
                    error = %transfer_error,
                    "Transfer failed, reverting reservation"
                );
                self.metrics.claim_failed();
                self.compensate(address, transfer_error).await
            }
        }
    }

    /// Revert the reservation after a failed transfer. A failure of the
    /// revert itself leaves the record stuck claimed with no transfer;
    /// that is surfaced as a distinct error so operators can correct
    /// the record.
    async fn compensate(
        &self,
        address: Address,
        transfer_error: spigot_transfer::TransferError,
    ) -> Result<ClaimReceipt> {
        match self.store.release(&address).await {
            Ok(()) => Err(FaucetError::TransferFailed(transfer_error.to_string())),
            Err(release_error) => {
                self.metrics.compensation_failed();
                error!(
                    address = %address,
                    transfer_error = %transfer_error,
                    store_error = %release_error,
                    "Compensation failed, record stuck claimed without a transfer"
                );
                Err(FaucetError::CompensationFailed {
                    address,
                    cause: release_error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use spigot_common::{ClaimRecord, Timestamp, TxHash};
    use spigot_ledger::{MemoryClaimStore, StoreError, StoreResult};
    use spigot_transfer::{MockTransferExecutor, TransferError, TransferResult};

    fn test_asset() -> AssetId {
        AssetId::parse("0x1::boson::Boson").unwrap()
    }

    fn create_coordinator(
        store: Arc<dyn ClaimStore>,
        executor: Arc<dyn TransferExecutor>,
    ) -> ClaimCoordinator {
        ClaimCoordinator::new(store, executor, TokenAmount::from_base_units(500), test_asset())
    }

    /// Store wrapper that counts every operation.
    struct CountingStore {
        inner: MemoryClaimStore,
        operations: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryClaimStore::new(),
                operations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ClaimStore for CountingStore {
        async fn get(&self, address: &Address) -> StoreResult<Option<ClaimRecord>> {
            self.operations.fetch_add(1, Ordering::SeqCst);
            self.inner.get(address).await
        }

        async fn reserve(
            &self,
            address: &Address,
            at: Timestamp,
        ) -> StoreResult<Reservation> {
            self.operations.fetch_add(1, Ordering::SeqCst);
            self.inner.reserve(address, at).await
        }

        async fn release(&self, address: &Address) -> StoreResult<()> {
            self.operations.fetch_add(1, Ordering::SeqCst);
            self.inner.release(address).await
        }
    }

    /// Store whose writes can be made to fail.
    struct BrokenStore {
        inner: MemoryClaimStore,
        fail_reserve: bool,
        fail_release: bool,
    }

    #[async_trait]
    impl ClaimStore for BrokenStore {
        async fn get(&self, address: &Address) -> StoreResult<Option<ClaimRecord>> {
            self.inner.get(address).await
        }

        async fn reserve(
            &self,
            address: &Address,
            at: Timestamp,
        ) -> StoreResult<Reservation> {
            if self.fail_reserve {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.inner.reserve(address, at).await
        }

        async fn release(&self, address: &Address) -> StoreResult<()> {
            if self.fail_release {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.inner.release(address).await
        }
    }

    /// Executor that checks the claim record is already reserved when
    /// the transfer runs.
    struct ObservingExecutor {
        store: Arc<MemoryClaimStore>,
        saw_reservation: AtomicBool,
    }

    #[async_trait]
    impl TransferExecutor for ObservingExecutor {
        fn name(&self) -> &str {
            "observing"
        }

        async fn transfer(&self, request: &TransferRequest) -> TransferResult<TxHash> {
            let record = self.store.get(&request.recipient).await.unwrap();
            if record.map(|r| r.claimed).unwrap_or(false) {
                self.saw_reservation.store(true, Ordering::SeqCst);
            }
            Ok(TxHash::new("tx-observed"))
        }
    }

    #[tokio::test]
    async fn test_happy_path() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(MockTransferExecutor::new());
        executor.enqueue_success("tx123");

        let coordinator = create_coordinator(store.clone(), executor.clone());
        let receipt = coordinator.claim("0xa11ce").await.unwrap();

        assert_eq!(receipt.tx_hash, TxHash::new("tx123"));
        assert_eq!(receipt.amount, TokenAmount::from_base_units(500));

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].recipient, Address::parse("0xa11ce").unwrap());
        assert_eq!(calls[0].amount, TokenAmount::from_base_units(500));
        assert_eq!(calls[0].asset, test_asset());

        let record = store
            .get(&Address::parse("0xa11ce").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(record.claimed);
        assert!(record.claimed_at.is_some());

        assert_eq!(coordinator.metrics().snapshot().claims_granted, 1);
    }

    #[tokio::test]
    async fn test_repeat_claim_rejected_without_transfer() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(MockTransferExecutor::new());
        executor.enqueue_success("tx123");

        let coordinator = create_coordinator(store, executor.clone());
        coordinator.claim("0xa11ce").await.unwrap();

        let result = coordinator.claim("0xa11ce").await;
        assert!(matches!(result, Err(FaucetError::AlreadyClaimed(_))));
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_address_spellings_share_one_claim() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(MockTransferExecutor::new());
        executor.enqueue_success("tx123");

        let coordinator = create_coordinator(store, executor.clone());
        coordinator.claim("0xA11CE").await.unwrap();

        let result = coordinator.claim("0xa11ce").await;
        assert!(matches!(result, Err(FaucetError::AlreadyClaimed(_))));
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_address_never_touches_store() {
        let store = Arc::new(CountingStore::new());
        let executor = Arc::new(MockTransferExecutor::new());
        let coordinator = create_coordinator(store.clone(), executor.clone());

        for input in ["", "   ", "banana", "0x", "0xzz"] {
            let result = coordinator.claim(input).await;
            assert!(matches!(result, Err(FaucetError::InvalidAddress(_))), "{:?}", input);
        }

        assert_eq!(store.operations.load(Ordering::SeqCst), 0);
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reservation_precedes_transfer() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(ObservingExecutor {
            store: store.clone(),
            saw_reservation: AtomicBool::new(false),
        });

        let coordinator = create_coordinator(store, executor.clone());
        coordinator.claim("0xbeef").await.unwrap();

        assert!(executor.saw_reservation.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_transfer_failure_compensates_then_retry_succeeds() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(MockTransferExecutor::new());
        executor.enqueue_failure(TransferError::Network("chain unreachable".to_string()));
        executor.enqueue_success("tx9");

        let coordinator = create_coordinator(store.clone(), executor.clone());

        let first = coordinator.claim("0xdead").await;
        assert!(matches!(first, Err(FaucetError::TransferFailed(_))));

        let record = store
            .get(&Address::parse("0xdead").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(!record.claimed);
        assert!(record.claimed_at.is_none());

        let second = coordinator.claim("0xdead").await.unwrap();
        assert_eq!(second.tx_hash, TxHash::new("tx9"));

        let record = store
            .get(&Address::parse("0xdead").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(record.claimed);
        assert_eq!(executor.call_count(), 2);
    }

    #[tokio::test]
    async fn test_store_unavailable_aborts_before_transfer() {
        let store = Arc::new(BrokenStore {
            inner: MemoryClaimStore::new(),
            fail_reserve: true,
            fail_release: false,
        });
        let executor = Arc::new(MockTransferExecutor::new());

        let coordinator = create_coordinator(store, executor.clone());
        let result = coordinator.claim("0x1").await;

        assert!(matches!(result, Err(FaucetError::StoreUnavailable(_))));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_compensation_failure_surfaced_distinctly() {
        let store = Arc::new(BrokenStore {
            inner: MemoryClaimStore::new(),
            fail_reserve: false,
            fail_release: true,
        });
        let executor = Arc::new(MockTransferExecutor::new());
        executor.enqueue_failure(TransferError::Rejected("insufficient funds".to_string()));

        let coordinator = create_coordinator(store, executor);
        let result = coordinator.claim("0x2").await;

        match result {
            Err(FaucetError::CompensationFailed { address, .. }) => {
                assert_eq!(address, Address::parse("0x2").unwrap());
            }
            other => panic!("expected CompensationFailed, got {:?}", other),
        }
        assert_eq!(coordinator.metrics().snapshot().compensation_failures, 1);
    }

    #[tokio::test]
    async fn test_concurrent_claims_single_transfer() {
        let store = Arc::new(MemoryClaimStore::new());
        let executor = Arc::new(
            MockTransferExecutor::new().with_latency(Duration::from_millis(50)),
        );
        executor.enqueue_success("tx-1");
        executor.enqueue_success("tx-2");

        let coordinator = Arc::new(create_coordinator(store, executor.clone()));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.claim("0xcafe").await })
        };
        let second = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.claim("0xcafe").await })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let granted = outcomes.iter().filter(|r| r.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|r| matches!(r, Err(FaucetError::AlreadyClaimed(_))))
            .count();

        assert_eq!(granted, 1);
        assert_eq!(rejected, 1);
        assert_eq!(executor.call_count(), 1);
    }
}
