//! Spigot Faucet Binary
//!
//! Wires configuration, the claim store, the transfer executor, and the
//! HTTP surface together and serves claims until shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spigot_common::FaucetError;
use spigot_coordinator::{server, ClaimCoordinator, FaucetConfig};
use spigot_crypto::FaucetSigner;
use spigot_ledger::{ClaimStore, MemoryClaimStore, PgClaimStore};
use spigot_transfer::{DryRunExecutor, TransferExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Spigot faucet");

    // Load configuration
    let config = FaucetConfig::from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    // Sender credentials are resolved eagerly; a faucet without a key
    // must not come up and fail per request.
    let signing_key = config
        .signing_key_hex
        .as_deref()
        .ok_or(FaucetError::MissingSigningKey)?;
    let signer = Arc::new(
        FaucetSigner::from_hex(signing_key)
            .map_err(|e| anyhow::anyhow!("Invalid signing key: {}", e))?,
    );
    info!(key_id = signer.key_id(), "Sender credentials loaded");

    let store: Arc<dyn ClaimStore> = match &config.database_url {
        Some(url) => {
            let store = PgClaimStore::connect(url).await?;
            store.ensure_schema().await?;
            info!("Using Postgres claim store");
            Arc::new(store)
        }
        None => {
            info!("No DATABASE_URL set, using in-memory claim store");
            Arc::new(MemoryClaimStore::new())
        }
    };

    let executor: Arc<dyn TransferExecutor> = Arc::new(DryRunExecutor::new(signer));
    let coordinator = Arc::new(ClaimCoordinator::new(
        store,
        executor,
        config.claim_amount,
        config.asset_id()?,
    ));

    let addr = format!("{}:{}", config.listen_addr, config.listen_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        listen_addr = %addr,
        amount = %config.claim_amount,
        asset = %config.asset,
        "Faucet accepting claims"
    );

    tokio::select! {
        result = server::run(listener, coordinator.clone()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    let snapshot = coordinator.metrics().snapshot();
    info!(
        claims_total = snapshot.claims_total,
        claims_granted = snapshot.claims_granted,
        claims_rejected = snapshot.claims_rejected,
        claims_failed = snapshot.claims_failed,
        compensation_failures = snapshot.compensation_failures,
        "Faucet stopped"
    );

    Ok(())
}
