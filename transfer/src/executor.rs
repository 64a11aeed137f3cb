//! Transfer executor capability.

use async_trait::async_trait;
use serde::Serialize;

use spigot_common::{Address, AssetId, TokenAmount, TxHash};

use crate::error::TransferResult;

/// A single transfer order: the faucet's fixed amount to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    /// Recipient address.
    pub recipient: Address,
    /// Amount in base units.
    pub amount: TokenAmount,
    /// Asset being dispensed.
    pub asset: AssetId,
}

/// Chain-facing transfer capability.
///
/// A call returns only after the transfer has reached a terminal
/// outcome; callers never observe an in-flight transfer.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Executor identity for logs.
    fn name(&self) -> &str;

    /// Submit the transfer and wait for its terminal outcome.
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TxHash>;
}

/// Scripted executor for tests.
///
/// Outcomes are consumed in FIFO order; with no outcome queued, a call
/// fails so tests notice unexpected invocations. Every call is recorded.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransferExecutor {
    outcomes: parking_lot::Mutex<std::collections::VecDeque<TransferResult<TxHash>>>,
    calls: parking_lot::Mutex<Vec<TransferRequest>>,
    latency: Option<std::time::Duration>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransferExecutor {
    /// Create a mock with no scripted outcomes.
    pub fn new() -> Self {
        Self {
            outcomes: parking_lot::Mutex::new(std::collections::VecDeque::new()),
            calls: parking_lot::Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Make every transfer take at least this long, so tests can hold
    /// several claims in flight at once.
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful outcome.
    pub fn enqueue_success(&self, tx_hash: impl Into<String>) {
        self.outcomes.lock().push_back(Ok(TxHash::new(tx_hash)));
    }

    /// Queue a failed outcome.
    pub fn enqueue_failure(&self, error: crate::TransferError) {
        self.outcomes.lock().push_back(Err(error));
    }

    /// Number of transfer calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// All transfer calls observed, in order.
    pub fn calls(&self) -> Vec<TransferRequest> {
        self.calls.lock().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockTransferExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl TransferExecutor for MockTransferExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TxHash> {
        self.calls.lock().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.outcomes.lock().pop_front().unwrap_or_else(|| {
            Err(crate::TransferError::Rejected(
                "no scripted outcome".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransferError;

    fn create_test_request() -> TransferRequest {
        TransferRequest {
            recipient: Address::parse("0xa11ce").unwrap(),
            amount: TokenAmount::from_base_units(500),
            asset: AssetId::parse("0x1::boson::Boson").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_mock_replays_outcomes_in_order() {
        let executor = MockTransferExecutor::new();
        executor.enqueue_failure(TransferError::Network("down".to_string()));
        executor.enqueue_success("tx1");

        let request = create_test_request();
        assert!(executor.transfer(&request).await.is_err());
        assert_eq!(
            executor.transfer(&request).await.unwrap(),
            TxHash::new("tx1")
        );
        assert_eq!(executor.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_fails_without_script() {
        let executor = MockTransferExecutor::new();
        let result = executor.transfer(&create_test_request()).await;
        assert!(matches!(result, Err(TransferError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let executor = MockTransferExecutor::new();
        executor.enqueue_success("tx1");

        let request = create_test_request();
        executor.transfer(&request).await.unwrap();

        assert_eq!(executor.calls(), vec![request]);
    }
}
