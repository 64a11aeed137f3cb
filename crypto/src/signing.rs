//! Transfer signing support using Ed25519.

use ed25519_dalek::{
    Signer, SigningKey as Ed25519SigningKey, Verifier, VerifyingKey as Ed25519VerifyingKey,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{CryptoError, Result};

/// The faucet's sender credential: an Ed25519 key that signs outgoing
/// transfers. Opaque to claim logic; only executors hold one.
pub struct FaucetSigner {
    inner: Ed25519SigningKey,
    key_id: String,
}

impl FaucetSigner {
    /// Generate a new random signer.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let inner = Ed25519SigningKey::generate(&mut csprng);
        let key_id = hex::encode(&inner.verifying_key().as_bytes()[..8]);

        Self { inner, key_id }
    }

    /// Create from raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid key length".to_string()))?;

        let inner = Ed25519SigningKey::from_bytes(&bytes);
        let key_id = hex::encode(&inner.verifying_key().as_bytes()[..8]);

        Ok(Self { inner, key_id })
    }

    /// Create from a hex-encoded key, with or without a `0x` prefix.
    /// This is the form configuration supplies.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let stripped = hex_key
            .strip_prefix("0x")
            .or_else(|| hex_key.strip_prefix("0X"))
            .unwrap_or(hex_key);

        let bytes = hex::decode(stripped)
            .map_err(|_| CryptoError::InvalidKey("Invalid hex encoding".to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> SignerPublicKey {
        SignerPublicKey {
            inner: self.inner.verifying_key(),
            key_id: self.key_id.clone(),
        }
    }

    /// Get the key ID.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a transfer payload.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.inner.sign(message);
        Signature {
            bytes: sig.to_bytes().to_vec(),
            key_id: self.key_id.clone(),
        }
    }
}

/// The public half of a signer, for verifying signed payloads.
#[derive(Clone)]
pub struct SignerPublicKey {
    inner: Ed25519VerifyingKey,
    key_id: String,
}

impl SignerPublicKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid key length".to_string()))?;

        let inner = Ed25519VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        let key_id = hex::encode(&bytes[..8]);

        Ok(Self { inner, key_id })
    }

    /// Get the key ID.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let sig_bytes: [u8; 64] = signature
            .bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;

        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

        self.inner
            .verify(message, &sig)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Get raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

/// A signature over a transfer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    /// Raw signature bytes.
    pub bytes: Vec<u8>,
    /// ID of the key that created this signature.
    pub key_id: String,
}

impl Signature {
    /// Get signature as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

// Local hex helpers; the signature surface is too small to warrant a
// dependency.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn decode(s: &str) -> std::result::Result<Vec<u8>, ()> {
        if s.len() % 2 != 0 {
            return Err(());
        }

        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let signer = FaucetSigner::generate();
        let public_key = signer.public_key();

        let message = b"transfer 500 to 0x1";
        let signature = signer.sign(message);

        assert!(public_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn test_invalid_signature() {
        let signer = FaucetSigner::generate();
        let public_key = signer.public_key();

        let message = b"transfer 500 to 0x1";
        let mut signature = signer.sign(message);

        // Corrupt the signature
        signature.bytes[0] ^= 0xff;

        assert!(public_key.verify(message, &signature).is_err());
    }

    #[test]
    fn test_from_hex_round_trip() {
        let signer = FaucetSigner::generate();
        let hex_key: String = signer
            .inner
            .to_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        let restored = FaucetSigner::from_hex(&hex_key).unwrap();
        assert_eq!(signer.key_id(), restored.key_id());

        let prefixed = FaucetSigner::from_hex(&format!("0x{}", hex_key)).unwrap();
        assert_eq!(signer.key_id(), prefixed.key_id());
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(FaucetSigner::from_hex("not hex").is_err());
        assert!(FaucetSigner::from_hex("abcd").is_err());
    }
}
