//! Spigot Transfer Executors
//!
//! The chain-facing side of the faucet. Executors own the sender
//! credentials and whatever construction, signing, submission, and
//! confirmation-wait the target chain requires; the claim coordinator
//! only sees `transfer(request) -> tx hash | typed error`.

pub mod dryrun;
pub mod error;
pub mod executor;

pub use dryrun::DryRunExecutor;
pub use error::{TransferError, TransferResult};
pub use executor::{TransferExecutor, TransferRequest};

#[cfg(any(test, feature = "test-utils"))]
pub use executor::MockTransferExecutor;
