//! Dry-run executor: signs transfers without submitting them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use spigot_common::TxHash;
use spigot_crypto::{sha256_hex, FaucetSigner};

use crate::error::{TransferError, TransferResult};
use crate::executor::{TransferExecutor, TransferRequest};

/// Executor that builds and signs the transfer payload, then
/// acknowledges it with a hash derived from the signature instead of
/// submitting to a chain.
///
/// This is the executor `faucetd` runs with out of the box; a chain SDK
/// integration replaces it behind the same trait for real deployments.
pub struct DryRunExecutor {
    signer: Arc<FaucetSigner>,
}

impl DryRunExecutor {
    /// Create a dry-run executor around the faucet's signer.
    pub fn new(signer: Arc<FaucetSigner>) -> Self {
        Self { signer }
    }

    fn payload(&self, request: &TransferRequest, nonce: Uuid) -> TransferResult<Vec<u8>> {
        let payload = serde_json::json!({
            "sender": self.signer.key_id(),
            "recipient": request.recipient,
            "amount": request.amount,
            "asset": request.asset,
            "nonce": nonce,
        });

        serde_json::to_vec(&payload).map_err(|e| TransferError::Signing(e.to_string()))
    }
}

#[async_trait]
impl TransferExecutor for DryRunExecutor {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TxHash> {
        let nonce = Uuid::new_v4();
        let payload = self.payload(request, nonce)?;
        let signature = self.signer.sign(&payload);
        let tx_hash = TxHash::new(format!("0x{}", sha256_hex(&signature.bytes)));

        debug!(
            recipient = %request.recipient,
            amount = %request.amount,
            asset = %request.asset,
            tx_hash = %tx_hash,
            "Signed transfer without submission"
        );

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spigot_common::{Address, AssetId, TokenAmount};

    fn create_test_executor() -> DryRunExecutor {
        DryRunExecutor::new(Arc::new(FaucetSigner::generate()))
    }

    fn create_test_request() -> TransferRequest {
        TransferRequest {
            recipient: Address::parse("0xa11ce").unwrap(),
            amount: TokenAmount::from_base_units(500),
            asset: AssetId::parse("0x1::boson::Boson").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_transfer_returns_hash() {
        let executor = create_test_executor();
        let tx_hash = executor.transfer(&create_test_request()).await.unwrap();

        let hex = tx_hash.as_str().strip_prefix("0x").unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_repeated_transfers_get_distinct_hashes() {
        let executor = create_test_executor();
        let request = create_test_request();

        let first = executor.transfer(&request).await.unwrap();
        let second = executor.transfer(&request).await.unwrap();
        assert_ne!(first, second);
    }
}
