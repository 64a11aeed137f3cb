//! Transfer executor error types.

use thiserror::Error;

/// Errors surfaced by a transfer executor.
///
/// A transfer may fail for many chain-side reasons; each one reaches the
/// coordinator as exactly one of these variants.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The chain rejected the transfer (insufficient sender balance,
    /// recipient invalid under chain rules, ...).
    #[error("Transfer rejected: {0}")]
    Rejected(String),

    /// The chain endpoint could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// Building or signing the transaction failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The confirmation wait timed out.
    #[error("Transfer timed out: {0}")]
    Timeout(String),
}

/// Result type for transfer operations.
pub type TransferResult<T> = std::result::Result<T, TransferError>;
