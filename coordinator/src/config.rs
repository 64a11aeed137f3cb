//! Faucet configuration.

use spigot_common::{AssetId, FaucetError, Result, TokenAmount};

/// Runtime configuration for the faucet, resolved once at startup and
/// treated as immutable afterwards.
#[derive(Debug, Clone)]
pub struct FaucetConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Postgres connection string; the in-memory store is used when
    /// unset.
    pub database_url: Option<String>,
    /// Fixed amount dispensed per claim, in base units.
    pub claim_amount: TokenAmount,
    /// Coin type dispensed by the faucet.
    pub asset: String,
    /// Hex-encoded sender signing key.
    pub signing_key_hex: Option<String>,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            database_url: None,
            // 10 tokens of an 8-decimal asset
            claim_amount: TokenAmount::from_base_units(1_000_000_000),
            asset: "0x1::boson::Boson".to_string(),
            signing_key_hex: None,
        }
    }
}

impl FaucetConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("FAUCET_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("FAUCET_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }

        if let Ok(amount) = std::env::var("FAUCET_CLAIM_AMOUNT") {
            if let Ok(units) = amount.parse::<u64>() {
                config.claim_amount = TokenAmount::from_base_units(units);
            }
        }

        if let Ok(asset) = std::env::var("FAUCET_ASSET") {
            config.asset = asset;
        }

        if let Ok(key) = std::env::var("FAUCET_SIGNING_KEY") {
            config.signing_key_hex = Some(key);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            return Err(FaucetError::ConfigurationError(
                "Listen port cannot be 0".to_string(),
            ));
        }

        if self.claim_amount.is_zero() {
            return Err(FaucetError::ConfigurationError(
                "Claim amount cannot be zero".to_string(),
            ));
        }

        self.asset_id()?;

        Ok(())
    }

    /// Get the configured asset as a parsed coin type.
    pub fn asset_id(&self) -> Result<AssetId> {
        AssetId::parse(&self.asset)
    }
}
