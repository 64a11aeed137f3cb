//! Spigot Cryptographic Primitives
//!
//! Provides the opaque signer capability consumed by transfer executors,
//! plus hashing helpers. Key custody strategy (env var, HSM, vault) is a
//! concern of whoever constructs the signer, not of claim logic.

pub mod hash;
pub mod signing;

pub use hash::{sha256, sha256_hex};
pub use signing::{FaucetSigner, Signature, SignerPublicKey};

/// Errors from cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
