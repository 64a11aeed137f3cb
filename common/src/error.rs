//! Error taxonomy for faucet operations.

use crate::Address;
use thiserror::Error;

/// Main error type for faucet operations.
///
/// Every collaborator failure is re-wrapped into one of these variants
/// before it reaches a caller; raw store or chain errors never cross the
/// request boundary.
#[derive(Debug, Error)]
pub enum FaucetError {
    /// Malformed recipient address; rejected before the store is touched.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The address already holds a granted claim.
    #[error("Address {0} has already claimed")]
    AlreadyClaimed(Address),

    /// The claim store failed before a reservation was written.
    #[error("Claim store unavailable: {0}")]
    StoreUnavailable(String),

    /// The transfer failed after reservation; the record was reverted.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// The transfer failed and the revert write also failed. The record
    /// for `address` is stuck claimed without a transfer and needs
    /// operator intervention.
    #[error("Compensation failed for {address}: {cause}")]
    CompensationFailed { address: Address, cause: String },

    /// Sender credentials are not configured.
    #[error("Signing key not configured")]
    MissingSigningKey,

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl FaucetError {
    /// Check if this failure is the caller's fault rather than the
    /// faucet's.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FaucetError::InvalidAddress(_) | FaucetError::AlreadyClaimed(_)
        )
    }

    /// Check if a retry of the same request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FaucetError::StoreUnavailable(_) | FaucetError::TransferFailed(_)
        )
    }

    /// Get a stable error code for wire responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FaucetError::InvalidAddress(_) => "INVALID_ADDRESS",
            FaucetError::AlreadyClaimed(_) => "ALREADY_CLAIMED",
            FaucetError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            FaucetError::TransferFailed(_) => "TRANSFER_FAILED",
            FaucetError::CompensationFailed { .. } => "COMPENSATION_FAILED",
            FaucetError::MissingSigningKey => "MISSING_SIGNING_KEY",
            FaucetError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the short message shown to callers. Underlying causes stay in
    /// the server log.
    pub fn public_message(&self) -> &'static str {
        match self {
            FaucetError::InvalidAddress(_) => "A valid recipient address is required",
            FaucetError::AlreadyClaimed(_) => "Address has already claimed tokens",
            FaucetError::StoreUnavailable(_) => {
                "Service temporarily unavailable. Please try again."
            }
            FaucetError::TransferFailed(_) => "Failed to send tokens. Please try again.",
            FaucetError::CompensationFailed { .. } => {
                "Failed to send tokens. Please contact support."
            }
            FaucetError::MissingSigningKey => "Faucet is not configured",
            FaucetError::ConfigurationError(_) => "Faucet is not configured",
        }
    }
}

/// Result type alias for faucet operations.
pub type Result<T> = std::result::Result<T, FaucetError>;
